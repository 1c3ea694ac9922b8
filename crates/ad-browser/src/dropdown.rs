//! Custom dropdown selection
//!
//! The site's selects are listbox-style widgets, not native `<select>`
//! elements, and do not expose their options until opened. The listbox is
//! linked to the field's *label* through `aria-labelledby` rather than to
//! the input, so selection needs both ids the resolver returns.

use tracing::{debug, warn};

use ad_core::fields::{normalize, DropdownField};

use crate::error::{BrowserError, Result};
use crate::resolve::wait_for_label;
use crate::session::BrowserSession;

/// Open the dropdown for `field` and pick the first option satisfying the
/// field's match policy.
///
/// Returns `Ok(false)` when the label/control never resolved or no option
/// matched after the full list was scanned — a soft failure the caller
/// decides the fatality of. A listbox that never renders at all is a hard
/// [`BrowserError::ElementNotFound`].
pub fn select_option(session: &BrowserSession, field: &DropdownField) -> Result<bool> {
    let Some(target) = wait_for_label(session, &field.label)? else {
        warn!("Label \"{}\" not found", field.label);
        return Ok(false);
    };

    let Some(label_id) = target.label_id.clone() else {
        warn!("Label \"{}\" has no id", field.label);
        return Ok(false);
    };
    let Some(control_selector) = target.control_selector() else {
        warn!("Label \"{}\" has no linked input", field.label);
        return Ok(false);
    };

    let normalized_target = normalize(&field.value);

    let control = session.wait_for_element(&control_selector)?;
    control.click().map_err(|e| {
        BrowserError::Interaction(format!(
            "Failed to open dropdown \"{}\": {}",
            field.label, e
        ))
    })?;

    if field.searchable {
        // Filter the option list before reading it.
        session.type_text(&normalized_target)?;
        debug!("Typed \"{}\" into \"{}\"", normalized_target, field.label);
    }

    let listbox_selector = format!(
        "div[role=\"listbox\"][aria-labelledby=\"{}\"]",
        label_id
    );
    session.wait_for_element(&listbox_selector)?;

    let option_selector = format!("{} div[role=\"option\"]", listbox_selector);
    let options = session.find_all(&option_selector);

    for option in &options {
        let text = match option.get_inner_text() {
            Ok(text) => text,
            Err(_) => continue,
        };
        let normalized_option = normalize(text.trim());

        if field.match_mode.matches(&normalized_option, &normalized_target) {
            // Click in page context; listbox rows may be virtualized.
            option
                .call_js_fn("function() { this.click(); }", vec![], false)
                .map_err(|e| {
                    BrowserError::Interaction(format!(
                        "Failed to select \"{}\" for \"{}\": {}",
                        field.value, field.label, e
                    ))
                })?;
            debug!("Selected \"{}\" for \"{}\"", normalized_option, field.label);
            return Ok(true);
        }
    }

    warn!(
        "No option matching \"{}\" for \"{}\" ({} scanned)",
        field.value,
        field.label,
        options.len()
    );
    Ok(false)
}
