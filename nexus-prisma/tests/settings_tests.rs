//! Process-wide setting changes reaching live resolvers
//!
//! Kept in its own test binary: `change_settings` mutates global state.

mod common;

use common::{MemoryClient, blog_document};
use nexus_prisma::{
    ResolveInfo, ResolverContext, ResolverError, Resolvers, Settings, SettingsInput,
    change_settings, generate_schema,
};
use serde_json::{Value, json};
use std::sync::Arc;

fn overrides(value: Value) -> SettingsInput {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_change_settings_reaches_new_resolvers() {
    let settings: Settings = serde_json::from_value(json!({"prismaClientContextField": "db"})).unwrap();
    let schema = generate_schema(&blog_document(), &settings).unwrap();
    let lookalike = Arc::new(MemoryClient::new().with_id("mock"));
    let info = ResolveInfo::new("Query", "users");
    let ctx = ResolverContext::new().with_client("db", lookalike.clone());

    let value = Resolvers::new(schema.clone())
        .resolve(&Value::Null, &json!({}), &ctx, &info)
        .await
        .unwrap();
    assert_eq!(value["total"], 0);

    let strict = overrides(json!({"checks": {"PrismaClientOnContext": {"strategy": "strict"}}}));
    change_settings(strict.clone());
    change_settings(strict);
    let err = Resolvers::new(schema.clone())
        .resolve(&Value::Null, &json!({}), &ctx, &info)
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::ClientCheck(_)));

    change_settings(overrides(json!({"checks": {"PrismaClientOnContext": {"enabled": false}}})));
    let resolvers = Resolvers::new(schema.clone());
    resolvers.resolve(&Value::Null, &json!({}), &ctx, &info).await.unwrap();

    change_settings(overrides(json!({"prismaClientContextField": "prisma"})));
    let err = Resolvers::new(schema.clone())
        .resolve(&Value::Null, &json!({}), &ctx, &info)
        .await
        .unwrap_err();
    assert!(matches!(err, ResolverError::MissingClient { ref field } if field == "prisma"));

    let ctx = ResolverContext::new().with_client("prisma", lookalike);
    Resolvers::new(schema)
        .resolve(&Value::Null, &json!({}), &ctx, &info)
        .await
        .unwrap();
}
