//! Wizard steps
//!
//! One function per page of the posting flow, applied in fixed forward
//! order against the live session. Label text, button text, and the
//! label/control association attributes are the only integration points
//! with the site; a redesign there invalidates them.

use std::time::Duration;

use tracing::{info, warn};

use ad_browser::resolve::element_attribute;
use ad_browser::{capture_full_page, dropdown, input, BrowserError, BrowserSession};
use ad_core::Config;

use crate::error::{Result, WizardError};

const LOGIN_ERROR_SELECTOR: &str = ".alert-error, .error-message, .text-error, .text-red-500";
const LOGIN_PATH_MARKERS: [&str; 2] = ["/login", "iniciar-sesion"];

const LISTING_LINK_SELECTOR: &str = "a.btn-primary";
const LISTING_TEXT: &str = "vende tu vehículo";
const LISTING_HREF_FRAGMENT: &str = "/particulares/vehiculos/publicar";

const PLAN_TEXT: &str = "elegir plan";
const NEXT_TEXT: &str = "siguiente";

const DETAILS_CONTAINER: &str = ".mantine-Paper-root";
const DETAILS_INPUT_PROBE: &str = "input[id*=\"mantine\"]";
const PRICE_LABEL: &str = "Precio";
const NEGOTIABLE_LABEL: &str = "Negociable";
const LOCATION_UNAVAILABLE: &str =
    "Location not available. Please verify the postal code and city are valid for Seminuevos.";

const EDITOR_SELECTOR: &str = "div[contenteditable=\"true\"].ProseMirror";
const FILE_INPUT_SELECTOR: &str = "input[type=\"file\"]";

const PUBLISH_SETTLE: Duration = Duration::from_secs(1);

/// Authenticate against the admin portal.
///
/// Success requires both the absence of any recognized error element and a
/// post-navigation address that no longer denotes a login page.
pub fn login(session: &BrowserSession, config: &Config) -> Result<()> {
    info!("Navigating to login page");
    session.navigate(&config.site.login_url)?;

    session.wait_for_element("#email")?;
    session.wait_for_element("#password")?;

    session.type_into("#email", &config.credentials.email)?;
    session.type_into("#password", &config.credentials.password)?;

    info!("Submitting login");
    let submit = session.wait_for_element("button[type=\"submit\"]")?;
    submit
        .click()
        .map_err(|e| WizardError::Authentication(format!("Could not submit: {}", e)))?;
    session.wait_until_navigated()?;

    if let Some(error_element) = session.try_find(LOGIN_ERROR_SELECTOR) {
        let text = error_element.get_inner_text().unwrap_or_default();
        return Err(WizardError::Authentication(text.trim().to_string()));
    }

    let url = session.current_url();
    if LOGIN_PATH_MARKERS.iter().any(|marker| url.contains(marker)) {
        return Err(WizardError::Authentication(
            "Still on login page".to_string(),
        ));
    }

    info!("Login successful");
    Ok(())
}

/// Enter the vehicle publishing flow via the primary call-to-action,
/// matched by visible text or link target.
pub fn start_listing(session: &BrowserSession) -> Result<()> {
    info!("Looking for the listing call-to-action");
    session.wait_for_element(LISTING_LINK_SELECTOR)?;

    for link in session.find_all(LISTING_LINK_SELECTOR) {
        let text = link
            .get_inner_text()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        let href = element_attribute(&link, "href")?;

        if text.contains(LISTING_TEXT)
            || href.is_some_and(|h| h.contains(LISTING_HREF_FRAGMENT))
        {
            link.click()
                .map_err(|e| WizardError::Navigation(format!("Could not activate listing link: {}", e)))?;
            session.wait_until_navigated()?;
            info!("Entered the vehicle publishing flow");
            return Ok(());
        }
    }

    Err(WizardError::ElementNotFound(
        "Could not find the \"vende tu vehículo\" button.".to_string(),
    ))
}

/// Pick the publishing plan.
pub fn select_plan(session: &BrowserSession) -> Result<()> {
    info!("Looking for the plan selection button");
    session.wait_for_element("button")?;

    if input::click_button_with_text(session, PLAN_TEXT)? {
        info!("Plan selected");
        return Ok(());
    }

    Err(WizardError::ElementNotFound(
        "No plan selection buttons found".to_string(),
    ))
}

/// Fill the vehicle-details step: the six fixed dropdowns in configured
/// order, the location fields, mileage, price, and the negotiable radio.
pub fn fill_vehicle_details(session: &BrowserSession, config: &Config, price: &str) -> Result<()> {
    info!("Filling vehicle details");

    session.wait_for_element(DETAILS_CONTAINER)?;
    // Make sure at least one input has rendered before resolving labels.
    session.wait_for_element(DETAILS_INPUT_PROBE)?;

    for field in &config.fields.dropdowns {
        if !dropdown::select_option(session, field)? {
            return Err(WizardError::Selection(format!(
                "No option \"{}\" available for \"{}\"",
                field.value, field.label
            )));
        }
    }

    let found_postal_code = dropdown::select_option(session, &config.fields.postal_code)?;
    let found_city = dropdown::select_option(session, &config.fields.city)?;
    if !found_postal_code || !found_city {
        return Err(WizardError::Selection(LOCATION_UNAVAILABLE.to_string()));
    }

    input::fill_by_label(session, &config.fields.mileage.label, &config.fields.mileage.value)?;
    input::fill_by_label(session, PRICE_LABEL, price)?;
    input::select_radio_by_label(session, NEGOTIABLE_LABEL)?;

    info!("Vehicle form filled");

    if !input::click_button_with_text(session, NEXT_TEXT)? {
        return Err(WizardError::Navigation(
            "Could not find or click the next button after vehicle form".to_string(),
        ));
    }
    Ok(())
}

/// Type the description into the rich-text editor and attach the images.
///
/// Advancing is best-effort on this step: the following page can render
/// without an explicit navigation, so a missed "next" is logged only.
pub fn fill_description_and_images(
    session: &BrowserSession,
    description: &str,
    images: &[String],
) -> Result<()> {
    info!("Adding description and images");

    let editor = session.wait_for_element(EDITOR_SELECTOR)?;
    editor
        .click()
        .map_err(|e| BrowserError::Interaction(format!("Failed to focus editor: {}", e)))?;
    session.type_text(description)?;
    info!("Description added");

    let Some(file_input) = session.try_find(FILE_INPUT_SELECTOR) else {
        return Err(WizardError::Upload(
            "Image upload input not found".to_string(),
        ));
    };
    session.set_file_input(&file_input, images).map_err(|e| match e {
        BrowserError::Upload(msg) => {
            WizardError::Upload(format!("Failed to upload images: {}", msg))
        }
        other => other.into(),
    })?;
    info!("Images uploaded");

    match input::click_button_with_text(session, NEXT_TEXT) {
        Ok(true) => {}
        Ok(false) => warn!("Next button not found after description step"),
        Err(e) => warn!("Could not advance after description step: {}", e),
    }
    Ok(())
}

/// Fill the contact phone number.
pub fn fill_contact_info(session: &BrowserSession, config: &Config) -> Result<()> {
    info!("Filling contact info");
    input::fill_by_label(session, &config.fields.phone.label, &config.fields.phone.value)?;

    match input::click_button_with_text(session, NEXT_TEXT) {
        Ok(true) => {}
        Ok(false) => warn!("Next button not found after contact step"),
        Err(e) => warn!("Could not advance after contact step: {}", e),
    }
    Ok(())
}

/// Terminal step: let late components settle, then capture the
/// proof-of-submission screenshot.
pub fn publish(session: &BrowserSession, config: &Config) -> Result<std::path::PathBuf> {
    std::thread::sleep(PUBLISH_SETTLE);

    info!("Taking final screenshot");
    let path = capture_full_page(session, &config.artifacts.dir, &config.artifacts.name)?;

    info!("Workflow finished successfully");
    Ok(path)
}
