//! Label-addressed input fill, radio select, and button activation

use tracing::{debug, warn};

use crate::error::{BrowserError, Result};
use crate::resolve::resolve_by_label;
use crate::session::BrowserSession;

/// Fill the input associated with `label_text`, clearing any pre-existing
/// value first and typing the new one keystroke by keystroke.
///
/// An unresolved label is logged and skipped; callers that need the field
/// filled must inspect downstream effects.
pub fn fill_by_label(session: &BrowserSession, label_text: &str, value: &str) -> Result<()> {
    let Some(selector) = resolve_control(session, label_text)? else {
        return Ok(());
    };

    let control = session.wait_for_element(&selector)?;
    control.click().map_err(|e| {
        BrowserError::Interaction(format!("Failed to focus \"{}\": {}", label_text, e))
    })?;
    control
        .call_js_fn("function() { this.value = ''; }", vec![], false)
        .map_err(|e| {
            BrowserError::Interaction(format!("Failed to clear \"{}\": {}", label_text, e))
        })?;

    session.type_text(value)?;
    debug!("Filled \"{}\" with \"{}\"", label_text, value);
    Ok(())
}

/// Click the radio control associated with `label_text` and verify it
/// actually became checked.
pub fn select_radio_by_label(session: &BrowserSession, label_text: &str) -> Result<()> {
    let Some(selector) = resolve_control(session, label_text)? else {
        return Ok(());
    };

    let control = session.wait_for_element(&selector)?;
    control.click().map_err(|e| {
        BrowserError::Interaction(format!("Failed to click radio \"{}\": {}", label_text, e))
    })?;

    let checked = control
        .call_js_fn("function() { return this.checked === true; }", vec![], false)
        .map_err(|e| {
            BrowserError::Interaction(format!(
                "Failed to read radio state \"{}\": {}",
                label_text, e
            ))
        })?;

    match checked.value {
        Some(serde_json::Value::Bool(true)) => {
            debug!("Radio \"{}\" selected", label_text);
            Ok(())
        }
        _ => Err(BrowserError::Interaction(format!(
            "Radio \"{}\" did not become checked",
            label_text
        ))),
    }
}

/// Click the first button whose visible text contains `text`
/// (case-insensitive) and wait for the resulting navigation.
///
/// Returns `Ok(false)` when no such button exists; the caller decides
/// whether that halts the step.
pub fn click_button_with_text(session: &BrowserSession, text: &str) -> Result<bool> {
    let wanted = text.to_lowercase();

    for button in session.find_all("button") {
        let button_text = match button.get_inner_text() {
            Ok(t) => t,
            Err(_) => continue,
        };
        if button_text.to_lowercase().contains(&wanted) {
            button.click().map_err(|e| {
                BrowserError::Interaction(format!("Failed to click \"{}\": {}", text, e))
            })?;
            session.wait_until_navigated()?;
            return Ok(true);
        }
    }

    Ok(false)
}

/// Resolve a label to its control selector, warning on the soft-failure
/// paths.
fn resolve_control(session: &BrowserSession, label_text: &str) -> Result<Option<String>> {
    let Some(target) = resolve_by_label(session, label_text)? else {
        warn!("Label \"{}\" not found", label_text);
        return Ok(None);
    };

    match target.control_selector() {
        Some(selector) => Ok(Some(selector)),
        None => {
            warn!("No input associated with label \"{}\"", label_text);
            Ok(None)
        }
    }
}
