//! Two document-access rules and three requests against them.
//!
//! Run with: `cargo run -p tessera-abac --example walkthrough`
//! (set `RUST_LOG=debug` to see rule insertion events).

use tessera_abac::{AttributeSet, Effect, PolicyStore, Result};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let store = PolicyStore::new();

    store.add_rule(
        AttributeSet::from([("role", "admin")]),
        AttributeSet::from([("type", "document")]),
        "read",
        Effect::Allow,
    )?;
    store.add_rule(
        AttributeSet::from([("role", "user"), ("department", "HR")]),
        AttributeSet::from([("type", "document"), ("classification", "public")]),
        "read",
        Effect::Allow,
    )?;

    let hr_user = AttributeSet::from([("role", "user"), ("department", "HR")]);
    let requests = [
        (
            "Admin reading document",
            AttributeSet::from([("role", "admin")]),
            AttributeSet::from([("type", "document")]),
        ),
        (
            "HR user reading public document",
            hr_user.clone(),
            AttributeSet::from([("type", "document"), ("classification", "public")]),
        ),
        (
            "HR user reading private document",
            hr_user,
            AttributeSet::from([("type", "document"), ("classification", "private")]),
        ),
    ];

    for (label, subject, resource) in &requests {
        let decision = store.evaluate(subject, resource, "read")?;
        let verdict = if decision.is_allowed() { "ALLOWED" } else { "DENIED" };
        println!("{label}: {verdict}");
    }

    Ok(())
}
