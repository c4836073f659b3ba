use dialoguer::Input;
use eyre::{eyre, Context, Result};

pub fn user_input(prompt: &str) -> Result<String> {
    Input::new()
        .with_prompt(prompt)
        .interact_text()
        .wrap_err_with(|| eyre!("User input cancelled"))
}
