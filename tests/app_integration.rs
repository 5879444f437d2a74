use chrono::{Duration, Utc};
use std::fs;
use std::path::Path;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UNIVERSE: [&str; 14] = [
        "USD", "MYR", "EUR", "GBP", "JPY", "SGD", "AUD", "CAD", "CHF", "NZD", "CNY", "HKD",
        "INR", "KRW",
    ];

    /// Every base quotes every currency at 2.0, except USD→MYR at 4.2.
    pub fn rate_table(base: &str) -> String {
        let rates: Vec<String> = UNIVERSE
            .iter()
            .map(|code| {
                let rate = match (base, *code) {
                    (b, c) if b == c => 1.0,
                    ("USD", "MYR") => 4.2,
                    _ => 2.0,
                };
                format!(r#""{code}": {rate}"#)
            })
            .collect();
        format!(
            r#"{{"result": "success", "base_code": "{base}", "rates": {{{}}}}}"#,
            rates.join(", ")
        )
    }

    pub async fn create_open_er_server() -> MockServer {
        let mock_server = MockServer::start().await;

        for base in UNIVERSE {
            Mock::given(method("GET"))
                .and(path(format!("/latest/{base}")))
                .respond_with(ResponseTemplate::new(200).set_body_string(rate_table(base)))
                .mount(&mock_server)
                .await;
        }

        Mock::given(method("GET"))
            .and(path_regex(r"^/latest/XYZ$"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"result": "error", "error-type": "unsupported-code"}"#),
            )
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn create_frankfurter_server() -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "EUR"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"amount": 1.0, "base": "USD", "rates": {"EUR": 0.9}}"#),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("to", "MYR"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message": "not found"}"#))
            .mount(&mock_server)
            .await;

        mock_server
    }
}

fn write_config(dir: &Path, open_er_uri: &str, frankfurter_uri: &str) -> (String, String) {
    let cache_path = dir.join("rates_cache.json");
    let config_path = dir.join("config.yaml");
    let config_content = format!(
        r#"
        providers:
          open_er:
            base_url: {open_er_uri}
          frankfurter:
            base_url: {frankfurter_uri}
        cache_path: "{}"
        retries: 0
        request_timeout_secs: 5
        precache_timeout_secs: 5
    "#,
        cache_path.display()
    );
    fs::write(&config_path, config_content).expect("Failed to write config file");
    (
        config_path.to_string_lossy().into_owned(),
        cache_path.to_string_lossy().into_owned(),
    )
}

fn convert_command(
    amount: &str,
    from: &str,
    to: &str,
    api: fxconv::core::ProviderKind,
) -> fxconv::AppCommand {
    fxconv::AppCommand::Convert {
        amount: amount.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        api: Some(api),
        json: true,
    }
}

fn read_cache(path: &str) -> serde_json::Map<String, serde_json::Value> {
    let text = fs::read_to_string(path).expect("cache file should exist");
    serde_json::from_str(&text).expect("cache file should be a JSON object")
}

#[test_log::test(tokio::test)]
async fn test_full_conversion_flow_with_mock() {
    use fxconv::core::ProviderKind;

    let open_er = test_utils::create_open_er_server().await;
    let frankfurter = test_utils::create_frankfurter_server().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (config_path, cache_path) = write_config(dir.path(), &open_er.uri(), &frankfurter.uri());

    let result = fxconv::run_command(
        convert_command("50", "USD", "MYR", ProviderKind::OpenEr),
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Conversion failed with: {:?}", result.err());

    let today = Utc::now().date_naive();
    let yesterday = today - Duration::days(1);
    let cache = read_cache(&cache_path);
    info!(entries = cache.len(), "Cache after first conversion");

    // Precache backfilled the whole matrix, plus today's realized rate
    assert_eq!(cache.len(), 14 * 13 + 1);
    assert_eq!(cache[&format!("USD_MYR_{yesterday}")], serde_json::json!(4.2));
    let today_rate = cache[&format!("USD_MYR_{today}")].as_f64().unwrap();
    assert!((today_rate - 4.2).abs() < 1e-9);
    assert!(!cache.contains_key(&format!("MYR_USD_{today}")));
}

#[test_log::test(tokio::test)]
async fn test_precache_command_is_idempotent() {
    let open_er = test_utils::create_open_er_server().await;
    let frankfurter = test_utils::create_frankfurter_server().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (config_path, cache_path) = write_config(dir.path(), &open_er.uri(), &frankfurter.uri());

    fxconv::run_command(fxconv::AppCommand::Precache { force: false }, Some(&config_path))
        .await
        .expect("first precache failed");
    let first = fs::read_to_string(&cache_path).unwrap();
    let requests_after_first = open_er.received_requests().await.unwrap().len();
    assert_eq!(requests_after_first, 14);

    fxconv::run_command(fxconv::AppCommand::Precache { force: false }, Some(&config_path))
        .await
        .expect("second precache failed");

    assert_eq!(fs::read_to_string(&cache_path).unwrap(), first);
    assert_eq!(open_er.received_requests().await.unwrap().len(), 14);
}

#[test_log::test(tokio::test)]
async fn test_existing_rates_survive_precache() {
    let open_er = test_utils::create_open_er_server().await;
    let frankfurter = test_utils::create_frankfurter_server().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (config_path, cache_path) = write_config(dir.path(), &open_er.uri(), &frankfurter.uri());

    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let key = format!("USD_EUR_{yesterday}");
    fs::write(&cache_path, format!(r#"{{"{key}": 0.5}}"#)).unwrap();

    fxconv::run_command(fxconv::AppCommand::Precache { force: false }, Some(&config_path))
        .await
        .expect("precache failed");

    let cache = read_cache(&cache_path);
    assert_eq!(cache.len(), 182);
    assert_eq!(cache[&key], serde_json::json!(0.5));
}

#[test_log::test(tokio::test)]
async fn test_restricted_provider_rejects_myr() {
    use fxconv::core::ProviderKind;

    let open_er = test_utils::create_open_er_server().await;
    let frankfurter = test_utils::create_frankfurter_server().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (config_path, cache_path) = write_config(dir.path(), &open_er.uri(), &frankfurter.uri());

    let result = fxconv::run_command(
        convert_command("10", "USD", "MYR", ProviderKind::Frankfurter),
        Some(&config_path),
    )
    .await;

    let err = result.expect_err("MYR should not be supported by Frankfurter");
    assert_eq!(
        err.downcast_ref::<fxconv::core::RateError>(),
        Some(&fxconv::core::RateError::UnsupportedTarget {
            provider: "Frankfurter".to_string(),
            currency: "MYR".to_string(),
        })
    );

    // Precache still ran, but no rate was recorded for the failed conversion
    let today = Utc::now().date_naive();
    assert!(!read_cache(&cache_path).contains_key(&format!("USD_MYR_{today}")));
}

#[test_log::test(tokio::test)]
async fn test_frankfurter_conversion() {
    use fxconv::core::ProviderKind;

    let open_er = test_utils::create_open_er_server().await;
    let frankfurter = test_utils::create_frankfurter_server().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (config_path, cache_path) = write_config(dir.path(), &open_er.uri(), &frankfurter.uri());

    fxconv::run_command(
        convert_command("100", "USD", "EUR", ProviderKind::Frankfurter),
        Some(&config_path),
    )
    .await
    .expect("Frankfurter conversion failed");

    let today = Utc::now().date_naive();
    let rate = read_cache(&cache_path)[&format!("USD_EUR_{today}")]
        .as_f64()
        .unwrap();
    assert!((rate - 0.9).abs() < 1e-9);
}

#[test_log::test(tokio::test)]
async fn test_invalid_base_is_reported() {
    use fxconv::core::ProviderKind;

    let open_er = test_utils::create_open_er_server().await;
    let frankfurter = test_utils::create_frankfurter_server().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (config_path, _) = write_config(dir.path(), &open_er.uri(), &frankfurter.uri());

    let err = fxconv::run_command(
        convert_command("10", "XYZ", "USD", ProviderKind::OpenEr),
        Some(&config_path),
    )
    .await
    .expect_err("XYZ is not a currency");

    assert_eq!(err.to_string(), "Invalid base currency: XYZ");
}

#[test_log::test(tokio::test)]
async fn test_invalid_amount_is_rejected() {
    use fxconv::core::ProviderKind;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (config_path, cache_path) =
        write_config(dir.path(), "http://127.0.0.1:9", "http://127.0.0.1:9");

    let err = fxconv::run_command(
        convert_command("-5", "USD", "EUR", ProviderKind::OpenEr),
        Some(&config_path),
    )
    .await
    .expect_err("negative amounts are invalid");

    assert!(err.to_string().starts_with("Invalid input"));
    assert!(!Path::new(&cache_path).exists());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let result = fxconv::run_command(
        fxconv::AppCommand::Currencies,
        Some("/nonexistent/fxconv/config.yaml"),
    )
    .await;
    assert!(result.is_err());
}
