use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
use chefdeck_shared::Ingredient;
use chefdeck_shopping::{GroceryError, HttpMergeClient, MergeIngredients};

async fn serve(router: Router) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn test_merge_posts_ingredients_with_api_key() -> anyhow::Result<()> {
    let router = Router::new().route(
        "/merge-ingredients",
        post(
            |headers: HeaderMap, Json(items): Json<Vec<Ingredient>>| async move {
                if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("secret") {
                    return Err(StatusCode::UNAUTHORIZED);
                }

                let total = items.iter().map(|i| i.amount).sum::<f64>();
                Ok(Json(vec![Ingredient::new("flour", total, "cup")]))
            },
        ),
    );
    let url = serve(router).await?;

    let client = HttpMergeClient::new(format!("{url}/"), "secret");
    let merged = client
        .merge(&[
            Ingredient::new("flour", 2.0, "cup"),
            Ingredient::new("flour", 1.0, "cup"),
        ])
        .await?;

    assert_eq!(merged, vec![Ingredient::new("flour", 3.0, "cup")]);

    let wrong_key = HttpMergeClient::new(url, "nope");
    let err = wrong_key
        .merge(&[Ingredient::new("flour", 2.0, "cup")])
        .await
        .unwrap_err();
    assert!(matches!(err, GroceryError::MergeFailed));

    Ok(())
}

#[tokio::test]
async fn test_merge_maps_status_codes() -> anyhow::Result<()> {
    let router = Router::new()
        .route(
            "/limited/merge-ingredients",
            post(|| async { StatusCode::TOO_MANY_REQUESTS }),
        )
        .route(
            "/broken/merge-ingredients",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route("/garbage/merge-ingredients", post(|| async { "not json" }));
    let url = serve(router).await?;
    let items = [Ingredient::new("flour", 2.0, "cup")];

    let err = HttpMergeClient::new(format!("{url}/limited"), "k")
        .merge(&items)
        .await
        .unwrap_err();
    assert!(matches!(err, GroceryError::RateLimited));
    assert_eq!(err.to_string(), "Too many requests. Try again in a minute.");

    let err = HttpMergeClient::new(format!("{url}/broken"), "k")
        .merge(&items)
        .await
        .unwrap_err();
    assert!(matches!(err, GroceryError::MergeFailed));
    assert_eq!(err.to_string(), "Could not merge ingredients.");

    let err = HttpMergeClient::new(format!("{url}/garbage"), "k")
        .merge(&items)
        .await
        .unwrap_err();
    assert!(matches!(err, GroceryError::MergeFailed));

    Ok(())
}

#[tokio::test]
async fn test_merge_unreachable_service() -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let err = HttpMergeClient::new(format!("http://{addr}"), "k")
        .merge(&[Ingredient::new("flour", 2.0, "cup")])
        .await
        .unwrap_err();
    assert!(matches!(err, GroceryError::MergeFailed));

    Ok(())
}
