//! Command template substitution
//!
//! Turns a stored command template and a prompt into a concrete process
//! invocation. The prompt always reaches the tool as one argument.
//!
//! - Plain templates (`claude -p`) are split into argv and run directly;
//!   the prompt is appended, or substituted into any word holding
//!   `{prompt}`.
//! - Templates using shell operators (`|`, `>`, `<`, `&`, `;`) run through
//!   `sh -c`. The prompt never enters the script text: it is passed as `$1`
//!   and the placeholder becomes a reference to it.

use crate::errors::{DispatchError, Result};

/// Placeholder marking where the prompt goes
pub const PROMPT_PLACEHOLDER: &str = "{prompt}";

/// A resolved program plus arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Shell-style rendering for debug output
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|word| {
                shlex::try_quote(word)
                    .map(|q| q.into_owned())
                    .unwrap_or_else(|_| word.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Whether the template needs a shell to interpret it
pub fn needs_shell(template: &str) -> bool {
    template.contains('|')
        || template.contains('>')
        || template.contains('<')
        || template.contains('&')
        || template.contains(';')
}

/// Build the invocation for `template` with `prompt` substituted
pub fn build_invocation(template: &str, prompt: &str) -> Result<Invocation> {
    let template = template.trim();
    if template.is_empty() {
        return Err(template_error(template, "command is empty"));
    }

    if needs_shell(template) {
        let script = shell_script(template)?;
        return shell_invocation(template, script, prompt);
    }

    let mut words = shlex::split(template)
        .ok_or_else(|| template_error(template, "unbalanced quotes"))?;
    if words.is_empty() {
        return Err(template_error(template, "command is empty"));
    }

    if words.iter().any(|w| w.contains(PROMPT_PLACEHOLDER)) {
        for word in words.iter_mut() {
            if word.contains(PROMPT_PLACEHOLDER) {
                *word = word.replace(PROMPT_PLACEHOLDER, prompt);
            }
        }
    } else {
        words.push(prompt.to_string());
    }

    let program = words.remove(0);
    Ok(Invocation {
        program,
        args: words,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quoting {
    Bare,
    Single,
    Double,
}

/// Shell script for `template` reading the prompt from `$1`
///
/// Each placeholder is rewritten for the quoting it sits in, so the prompt
/// expands to exactly one word and is never parsed as shell syntax.
/// Without a placeholder, `"$1"` is appended.
pub fn shell_script(template: &str) -> Result<String> {
    let mut script = String::with_capacity(template.len() + 8);
    let mut quoting = Quoting::Bare;
    let mut placed = false;
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if rest.starts_with(PROMPT_PLACEHOLDER) {
            script.push_str(match quoting {
                Quoting::Bare => "\"$1\"",
                Quoting::Double => "$1",
                Quoting::Single => "'\"$1\"'",
            });
            placed = true;
            rest = &rest[PROMPT_PLACEHOLDER.len()..];
            continue;
        }

        script.push(c);
        rest = &rest[c.len_utf8()..];

        match (quoting, c) {
            (Quoting::Bare, '\\') | (Quoting::Double, '\\') => {
                if let Some(escaped) = rest.chars().next() {
                    script.push(escaped);
                    rest = &rest[escaped.len_utf8()..];
                }
            }
            (Quoting::Bare, '\'') => quoting = Quoting::Single,
            (Quoting::Bare, '"') => quoting = Quoting::Double,
            (Quoting::Single, '\'') | (Quoting::Double, '"') => quoting = Quoting::Bare,
            _ => {}
        }
    }

    if quoting != Quoting::Bare {
        return Err(template_error(template, "unbalanced quotes"));
    }
    if !placed {
        script.push_str(" \"$1\"");
    }
    Ok(script)
}

#[cfg(unix)]
fn shell_invocation(_template: &str, script: String, prompt: &str) -> Result<Invocation> {
    Ok(Invocation {
        program: "sh".to_string(),
        args: vec![
            "-c".to_string(),
            script,
            "sh".to_string(),
            prompt.to_string(),
        ],
    })
}

#[cfg(not(unix))]
fn shell_invocation(template: &str, _script: String, _prompt: &str) -> Result<Invocation> {
    Err(template_error(
        template,
        "shell operators in commands are only supported on Unix",
    ))
}

fn template_error(template: &str, reason: &str) -> DispatchError {
    DispatchError::Template {
        template: template.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_prompt_appended_as_one_arg() {
        let inv = build_invocation("claude -p", "what is   rust?").unwrap();
        assert_eq!(inv.program, "claude");
        assert_eq!(inv.args, vec!["-p", "what is   rust?"]);
    }

    #[test]
    fn test_placeholder_substitution() {
        let inv = build_invocation("codex exec {prompt} --quiet", "fix it; now").unwrap();
        assert_eq!(inv.program, "codex");
        assert_eq!(inv.args, vec!["exec", "fix it; now", "--quiet"]);
    }

    #[test]
    fn test_placeholder_inside_word() {
        let inv = build_invocation("tool --prompt={prompt}", "a b").unwrap();
        assert_eq!(inv.args, vec!["--prompt=a b"]);
    }

    #[test]
    fn test_quoted_template_words() {
        let inv = build_invocation("gemini --model 'pro 2' -p", "hi").unwrap();
        assert_eq!(inv.args, vec!["--model", "pro 2", "-p", "hi"]);
    }

    #[test]
    fn test_unbalanced_quotes_rejected() {
        assert!(build_invocation("gemini -p \"oops", "hi").is_err());
    }

    #[test]
    fn test_empty_template_rejected() {
        assert!(build_invocation("   ", "hi").is_err());
    }

    #[test]
    fn test_needs_shell() {
        assert!(needs_shell("claude -p {prompt} | tee out.txt"));
        assert!(needs_shell("cd /tmp && codex"));
        assert!(!needs_shell("claude -p"));
    }

    #[test]
    fn test_shell_script_placeholder_by_quoting() {
        assert_eq!(shell_script("echo {prompt} | cat").unwrap(), "echo \"$1\" | cat");
        assert_eq!(shell_script("echo \"{prompt}\" | cat").unwrap(), "echo \"$1\" | cat");
        assert_eq!(shell_script("echo 'x {prompt}' | cat").unwrap(), "echo 'x '\"$1\"'' | cat");
        assert_eq!(shell_script("echo \\{prompt} | cat").unwrap(), "echo \\{prompt} | cat \"$1\"");
    }

    #[test]
    fn test_shell_script_appends_prompt() {
        assert_eq!(shell_script("claude -p | tee log").unwrap(), "claude -p | tee log \"$1\"");
    }

    #[test]
    fn test_shell_script_unbalanced_quotes() {
        assert!(shell_script("echo \"{prompt} | cat").is_err());
        assert!(shell_script("echo '{prompt} | cat").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_template_passes_prompt_as_parameter() {
        let inv = build_invocation("echo \"{prompt}\" | cat", "it's $HOME").unwrap();
        assert_eq!(inv.program, "sh");
        assert_eq!(inv.args, vec!["-c", "echo \"$1\" | cat", "sh", "it's $HOME"]);
    }

    #[cfg(not(unix))]
    #[test]
    fn test_shell_template_unsupported() {
        assert!(build_invocation("tool {prompt} | more", "a & del x").is_err());
    }

    #[test]
    fn test_display_quotes_words() {
        let inv = build_invocation("claude -p", "two words").unwrap();
        let words = shlex::split(&inv.display()).unwrap();
        assert_eq!(words, vec!["claude", "-p", "two words"]);
    }

    #[quickcheck]
    fn prop_plain_template_keeps_prompt_whole(prompt: String) -> bool {
        let inv = build_invocation("claude -p", &prompt).unwrap();
        inv.args.len() == 2 && inv.args[1] == prompt
    }

    #[cfg(unix)]
    fn shell_echo(template: &str, prompt: &str) -> String {
        let inv = build_invocation(template, prompt).unwrap();
        let output = std::process::Command::new(&inv.program)
            .args(&inv.args)
            .output()
            .unwrap();
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    #[cfg(unix)]
    const SHELL_TEMPLATES: [&str; 3] = [
        "printf '%s' {prompt} | cat",
        "printf '%s' \"{prompt}\" | cat",
        "printf '%s' '{prompt}' | cat",
    ];

    #[cfg(unix)]
    #[test]
    fn test_shell_template_does_not_run_prompt() {
        let prompts = [
            "$(echo INJECTED)",
            "`echo INJECTED`",
            "it's $HOME",
            "say \"hi\" & exit 3; rm -rf nothing",
            "  spaced\tout  ",
        ];
        for template in SHELL_TEMPLATES {
            for prompt in prompts {
                assert_eq!(shell_echo(template, prompt), prompt, "template {}", template);
            }
        }
    }

    #[cfg(unix)]
    #[quickcheck]
    fn prop_shell_template_keeps_prompt_whole(prompt: String) -> TestResult {
        if prompt.contains('\0') {
            return TestResult::discard();
        }
        let garnished = format!("'\"$`$(x)` {}", prompt);
        TestResult::from_bool(
            SHELL_TEMPLATES
                .iter()
                .all(|template| shell_echo(template, &garnished) == garnished),
        )
    }
}
