use mockall::automock;

/// Interactive yes/no question put to the operator.
#[automock]
pub trait Confirm: Send + Sync {
    /// Blocks until the operator answers. `false` means the operator declined.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Prompts on the terminal. Any terminal error counts as a "no".
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        dialoguer::Confirm::new().with_prompt(prompt).default(false).interact().unwrap_or(false)
    }
}
