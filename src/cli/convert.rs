use super::ui;
use crate::app::App;
use crate::convert::{Conversion, ConversionRequest};
use crate::core::currency::ProviderKind;
use crate::core::error::RateError;
use crate::core::volatility::Volatility;
use anyhow::Result;
use serde::Serialize;

/// Response shape shared by successful and failed conversions.
#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub output: Option<String>,
    pub error: Option<String>,
    pub volatility: Option<Volatility>,
}

impl From<&Result<Conversion, RateError>> for ConversionResponse {
    fn from(result: &Result<Conversion, RateError>) -> Self {
        match result {
            Ok(conversion) => ConversionResponse {
                output: Some(conversion.output.clone()),
                error: None,
                volatility: Some(conversion.volatility),
            },
            Err(e) => ConversionResponse {
                output: None,
                error: Some(e.to_string()),
                volatility: None,
            },
        }
    }
}

pub async fn run(
    app: &App,
    amount: &str,
    from: &str,
    to: &str,
    api: Option<ProviderKind>,
    json: bool,
) -> Result<()> {
    let api = api.unwrap_or(app.config.default_api);
    let result = match ConversionRequest::parse(amount, from, to, api) {
        Ok(request) => app.convert(&request).await,
        Err(e) => Err(e),
    };

    if json {
        let response = ConversionResponse::from(&result);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        display(&result, api);
    }

    result.map(|_| ()).map_err(anyhow::Error::from)
}

fn display(result: &Result<Conversion, RateError>, api: ProviderKind) {
    // Errors are reported by the caller
    let Ok(conversion) = result else {
        return;
    };

    println!("{}", ui::style_text(&conversion.output, ui::StyleType::Result));
    let rate_line = format!(
        "1 {} = {} {} via {}",
        conversion.from, conversion.rate, conversion.to, api
    );
    println!("{}", ui::style_text(&rate_line, ui::StyleType::Subtle));
    println!("Volatility: {}", ui::style_volatility(&conversion.volatility));
}
