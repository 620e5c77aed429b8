use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::usecase::table::entity_table::DeletePrompt;

pub fn confirm(title: &str, description: &str) -> bool {
    let answer = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show();
    answer == MessageDialogResult::Yes
}

pub fn confirm_delete(prompt: &DeletePrompt) -> bool {
    confirm(
        &prompt.title,
        &format!("{}\n\nChoose Yes to {}.", prompt.message, prompt.confirm_label.to_lowercase()),
    )
}

pub fn show_error(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn show_info(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}
