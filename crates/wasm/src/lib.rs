mod dom;
mod page;
mod reveal;

pub use page::PortfolioPage;
pub use reveal::Reveal;

use folio_core::FolioError;
use folio_core::content::Portfolio;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

pub(crate) fn to_js_error(e: FolioError) -> JsError {
    JsError::new(&e.to_string())
}

/// Parse and validate portfolio content, returning it re-serialized with
/// defaults filled in.
#[wasm_bindgen(js_name = loadPortfolio)]
pub fn load_portfolio(json: &str) -> Result<String, JsError> {
    let portfolio = Portfolio::from_json(json.as_bytes()).map_err(to_js_error)?;
    serde_json::to_string(&portfolio).map_err(|e| JsError::new(&e.to_string()))
}

/// The bundled demo content as JSON.
#[wasm_bindgen(js_name = samplePortfolio)]
pub fn sample_portfolio() -> Result<String, JsError> {
    let portfolio = Portfolio::sample().map_err(to_js_error)?;
    serde_json::to_string(&portfolio).map_err(|e| JsError::new(&e.to_string()))
}

/// Footer copyright line for the given content and year.
#[wasm_bindgen]
pub fn copyright(json: &str, year: i32) -> Result<String, JsError> {
    let portfolio = Portfolio::from_json(json.as_bytes()).map_err(to_js_error)?;
    Ok(portfolio.copyright(year))
}
