//! End-to-end: manifest JSON -> invocation string -> resolved scopes.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use taskscope_core::{
    ActionRegistry, ActionResult, ArgScope, FnAction, InvokeError, Invoker, Manifest, TaskName,
    parse_invocation,
};

const MANIFEST: &str = r#"
{
  "default": "ship",
  "tasks": [
    { "name": "fetch", "args": ["mirror"], "defaults": { "mirror": "origin" } },
    { "name": "compile", "args": ["target", "profile"],
      "defaults": { "profile": "debug" }, "prerequisites": ["fetch"] },
    { "name": "package", "args": ["format"], "prerequisites": ["compile"] },
    { "name": "ship", "args": ["target", "profile"],
      "prerequisites": ["compile", "package"] }
  ]
}"#;

fn recording_registry(manifest: &Manifest) -> (ActionRegistry, Arc<Mutex<Vec<(String, Value)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut reg = ActionRegistry::new();
    for decl in &manifest.tasks {
        let seen = Arc::clone(&seen);
        reg.register(
            decl.name.clone(),
            Arc::new(FnAction::new(move |task: &TaskName, args: &ArgScope| -> ActionResult {
                let snapshot = serde_json::to_value(args)?;
                seen.lock().unwrap().push((task.to_string(), snapshot));
                Ok(())
            })),
        )
        .unwrap();
    }
    (reg, seen)
}

#[tokio::test]
async fn scopes_flow_down_the_prerequisite_chain() {
    let manifest = Manifest::from_json_str(MANIFEST).unwrap();
    let (reg, seen) = recording_registry(&manifest);
    let mut invoker = Invoker::new(manifest, Arc::new(reg)).unwrap();

    let report = invoker
        .invoke(parse_invocation("ship[aarch64, release, tar]"))
        .await
        .unwrap();

    assert_eq!(report.order(), vec!["fetch", "compile", "package", "ship"]);

    // fetch declares only `mirror`; its default fills it
    let fetch = &report.get("fetch").unwrap().args;
    assert_eq!(fetch.get("mirror"), Some(&json!("origin")));
    // ...while names it never declared resolve through compile and ship
    assert_eq!(fetch.get("target"), Some(&json!("aarch64")));
    assert_eq!(fetch.extras(), &[json!("tar")]);

    // compile re-declares profile; the call value wins over its default
    let compile = &report.get("compile").unwrap().args;
    assert_eq!(compile.get("profile"), Some(&json!("release")));

    // package's `format` was never bound by name anywhere
    let package = &report.get("package").unwrap().args;
    assert_eq!(package.get("format"), None);
    assert_eq!(package.extras(), &[json!("tar")]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[3], ("ship".to_string(), json!({"target": "aarch64", "profile": "release"})));
}

#[tokio::test]
async fn default_task_runs_with_declared_defaults_only() {
    let manifest = Manifest::from_json_str(MANIFEST).unwrap();
    let (reg, _) = recording_registry(&manifest);
    let mut invoker = Invoker::new(manifest, Arc::new(reg)).unwrap();

    let report = invoker.invoke_default().await.unwrap();
    let compile = &report.get("compile").unwrap().args;
    assert_eq!(compile.get("target"), None);
    assert_eq!(compile.get("profile"), Some(&json!("debug")));
}

#[tokio::test]
async fn unknown_invocation_reports_task_name() {
    let manifest = Manifest::from_json_str(MANIFEST).unwrap();
    let mut invoker = Invoker::new(manifest, Arc::new(ActionRegistry::new())).unwrap();

    let err = invoker.invoke(parse_invocation("deploy[now]")).await.unwrap_err();
    assert!(matches!(err, InvokeError::UnknownTask(ref t) if t.as_str() == "deploy"));
    assert_eq!(err.to_string(), "don't know how to build task 'deploy'");
}
