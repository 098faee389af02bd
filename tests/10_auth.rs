mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn root_is_public() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app.client.get(format!("{}/", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["name"], json!("Fazenda API"));
    Ok(())
}

#[tokio::test]
async fn health_reports_data_service_status() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .get(format!("{}/health", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["status"], json!("ok"));
    Ok(())
}

#[tokio::test]
async fn protected_route_without_header_is_401() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .get(format!("{}/api/safras", app.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Token não encontrado"));
    Ok(())
}

#[tokio::test]
async fn write_without_header_never_reaches_data_service() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .post(format!("{}/api/safras", app.base_url))
        .json(&json!({ "nome": "Safra 2024/25", "data_inicio": "2024-09-01" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.writes(), 0, "no write may reach the data service");
    Ok(())
}

#[tokio::test]
async fn well_formed_but_invalid_token_is_401() -> Result<()> {
    let app = common::spawn_app().await?;

    let res = app
        .client
        .get(format!("{}/api/safras", app.base_url))
        .header("Authorization", "Bearer not-the-right-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], json!("Token inválido"));

    // A rejected token must also block writes before they happen.
    let res = app
        .client
        .post(format!("{}/api/estoque-insumos", app.base_url))
        .header("Authorization", "Bearer not-the-right-token")
        .json(&json!({ "insumo_id": 3, "quantidade": 50 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.writes(), 0);
    Ok(())
}

#[tokio::test]
async fn valid_token_lists_rows_with_count() -> Result<()> {
    let app = common::spawn_app().await?;
    app.seed(
        "safras",
        vec![
            json!({ "id": 1, "nome": "Safra 2023/24", "data_inicio": "2023-09-01" }),
            json!({ "id": 2, "nome": "Safra 2024/25", "data_inicio": "2024-09-01" }),
        ],
    );

    let res = app
        .client
        .get(format!("{}/api/safras", app.base_url))
        .header("Authorization", app.bearer())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["count"], json!(2));

    // Listings order by data_inicio descending.
    let data = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(data[0]["id"], json!(2));
    assert_eq!(data[1]["id"], json!(1));
    Ok(())
}
