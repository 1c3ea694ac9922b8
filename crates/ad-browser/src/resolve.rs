//! Label-driven element resolution
//!
//! The target site's form controls carry framework-generated ids that are
//! not stable across page loads, so controls are located through their
//! visible label text instead: scan the rendered `<label>` elements for the
//! first whose text contains the wanted label, then follow its `for`
//! association to the control. Multiple labels may match the substring
//! search; the first in document order wins.

use headless_chrome::Element;
use serde::Deserialize;
use tracing::debug;

use crate::error::{BrowserError, Result};
use crate::session::BrowserSession;

/// Resolution result: the matched label's own id (needed to scope the
/// listbox of a custom dropdown via `aria-labelledby`) and the id of the
/// control the label points at.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelTarget {
    pub label_id: Option<String>,
    pub control_id: Option<String>,
}

impl LabelTarget {
    /// CSS selector for the associated control, if the label has one.
    pub fn control_selector(&self) -> Option<String> {
        self.control_id.as_ref().map(|id| format!("#{}", id))
    }
}

/// Locate the first label whose visible text contains `label_text` and
/// read its association attributes. Absence is `Ok(None)`, never an error;
/// the caller decides whether that is fatal.
pub fn resolve_by_label(session: &BrowserSession, label_text: &str) -> Result<Option<LabelTarget>> {
    let needle = js_string(label_text);
    let expression = format!(
        r#"(() => {{
            const needle = {needle};
            const label = Array.from(document.querySelectorAll('label'))
                .find(l => (l.textContent || '').includes(needle));
            if (!label) return JSON.stringify(null);
            return JSON.stringify({{
                label_id: label.getAttribute('id'),
                control_id: label.getAttribute('for'),
            }});
        }})()"#
    );

    let value = session.eval_json(&expression)?;
    let target: Option<LabelTarget> = serde_json::from_value(value)
        .map_err(|e| BrowserError::Evaluation(format!("Malformed label scan result: {}", e)))?;

    match &target {
        Some(t) => debug!(
            "Label \"{}\" resolved (label_id: {:?}, control_id: {:?})",
            label_text, t.label_id, t.control_id
        ),
        None => debug!("Label \"{}\" not present", label_text),
    }

    Ok(target)
}

/// Like [`resolve_by_label`], but keeps scanning under the session's retry
/// policy until the label renders. Still `Ok(None)` when the label never
/// appears.
pub fn wait_for_label(session: &BrowserSession, label_text: &str) -> Result<Option<LabelTarget>> {
    let outcome = session.config().retry.run(|| {
        match resolve_by_label(session, label_text) {
            Ok(Some(target)) => Ok(Some(target)),
            // Not rendered yet: retryable.
            Ok(None) => Err(None),
            Err(e) => Err(Some(e)),
        }
    });

    match outcome {
        Ok(target) => Ok(target),
        Err(Some(e)) => Err(e),
        Err(None) => Ok(None),
    }
}

/// Read an attribute off a live element via JS.
pub fn element_attribute(element: &Element<'_>, name: &str) -> Result<Option<String>> {
    let function = format!(
        "function() {{ return this.getAttribute({}); }}",
        js_string(name)
    );
    let object = element
        .call_js_fn(&function, vec![], false)
        .map_err(|e| BrowserError::Evaluation(format!("Attribute read failed: {}", e)))?;

    match object.value {
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Quote a Rust string as a JS string literal.
pub(crate) fn js_string(text: &str) -> String {
    serde_json::to_string(text).expect("string serialization is infallible")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string(r#"Ciudad "del" vehículo"#), r#""Ciudad \"del\" vehículo""#);
    }

    #[test]
    fn test_control_selector() {
        let target = LabelTarget {
            label_id: Some("mantine-r5-label".to_string()),
            control_id: Some("mantine-r5".to_string()),
        };
        assert_eq!(target.control_selector().as_deref(), Some("#mantine-r5"));

        let orphan = LabelTarget {
            label_id: None,
            control_id: None,
        };
        assert!(orphan.control_selector().is_none());
    }
}
