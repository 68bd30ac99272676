//! Parsing of invocation strings like `deploy[staging, eu-west]`.
//!
//! Syntax:
//! - `name` runs `name` with no arguments
//! - `name[a,b]` runs `name` with positional arguments `"a"` and `"b"`
//! - whitespace around each argument is dropped
//! - `\x` stands for a literal `x` (so `\,` is a comma inside an argument)
//!
//! Anything that is not of the form `name[...]` is taken as a bare task name.

use serde_json::Value;

use crate::domain::TaskName;

/// A task name plus the ordered positional values it was called with.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub task: TaskName,
    pub args: Vec<Value>,
}

impl Invocation {
    pub fn new(task: impl Into<TaskName>, args: Vec<Value>) -> Self {
        Self {
            task: task.into(),
            args,
        }
    }
}

pub fn parse_invocation(s: &str) -> Invocation {
    let Some((name, inner)) = split_brackets(s) else {
        return Invocation::new(s, Vec::new());
    };
    let args = split_args(inner).into_iter().map(Value::String).collect();
    Invocation::new(name, args)
}

/// `name[inner]` -> (name, inner). `name` must be non-empty and the string
/// must end with the closing bracket.
fn split_brackets(s: &str) -> Option<(&str, &str)> {
    let open = s.find('[')?;
    if open == 0 || !s.ends_with(']') || s.len() < open + 2 {
        return None;
    }
    Some((&s[..open], &s[open + 1..s.len() - 1]))
}

fn split_args(inner: &str) -> Vec<String> {
    if inner.is_empty() {
        return Vec::new();
    }

    let mut args = Vec::new();
    let mut current = String::new();
    // length of `current` up to and including the last escaped char;
    // trailing whitespace before this point is kept
    let mut protected = 0;
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    protected = current.len();
                }
                None => current.push('\\'),
            },
            ',' => {
                args.push(finish_arg(&mut current, protected));
                protected = 0;
            }
            c if c.is_whitespace() && current.is_empty() => {}
            c => current.push(c),
        }
    }
    args.push(finish_arg(&mut current, protected));
    args
}

fn finish_arg(current: &mut String, protected: usize) -> String {
    let trimmed_len = current.trim_end().len().max(protected);
    current.truncate(trimmed_len);
    std::mem::take(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args_of(s: &str) -> Vec<String> {
        parse_invocation(s)
            .args
            .into_iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[rstest]
    #[case::bare("build", "build")]
    #[case::with_args("build[a,b]", "build")]
    #[case::namespaced("db:migrate[1]", "db:migrate")]
    #[case::no_closing_bracket("build[a", "build[a")]
    #[case::leading_bracket("[a]", "[a]")]
    fn task_name_is_text_before_brackets(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_invocation(input).task.as_str(), expected);
    }

    #[rstest]
    #[case::none("build", vec![])]
    #[case::empty_brackets("build[]", vec![])]
    #[case::single("build[one]", vec!["one"])]
    #[case::trims_whitespace("build[ 1 ,  2 ]", vec!["1", "2"])]
    #[case::inner_space_kept("greet[John Smith]", vec!["John Smith"])]
    #[case::escaped_comma(r"t[a\,b,c]", vec!["a,b", "c"])]
    #[case::escaped_backslash(r"t[a\\b]", vec![r"a\b"])]
    #[case::escaped_trailing_space(r"t[a\ ]", vec!["a "])]
    #[case::empty_middle("t[a,,b]", vec!["a", "", "b"])]
    #[case::trailing_comma("t[a,]", vec!["a", ""])]
    #[case::nested_bracket("t[a[1],b]", vec!["a[1]", "b"])]
    fn arguments_are_split_on_unescaped_commas(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(args_of(input), expected);
    }

    #[test]
    fn arguments_are_json_strings() {
        let inv = parse_invocation("build[1,true]");
        assert_eq!(
            inv.args,
            vec![Value::String("1".into()), Value::String("true".into())]
        );
    }
}
