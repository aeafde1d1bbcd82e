//! Property-based tests for determinism guarantees

use dockyard::context::{Context, ScopeType, Viewport};
use proptest::prelude::*;

fn scope_strategy() -> impl Strategy<Value = ScopeType> {
    prop_oneof![
        Just(ScopeType::Global),
        Just(ScopeType::Template),
        Just(ScopeType::Instance),
    ]
}

fn viewport_strategy() -> impl Strategy<Value = Viewport> {
    prop_oneof![
        Just(Viewport::Desktop),
        Just(Viewport::Mobile),
        Just(Viewport::All),
    ]
}

/// Slug-safe identifiers: what callers hand the engine after normalization.
fn slug_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9-]{0,16}"
}

/// Test that signatures are deterministic: equal fields always produce the
/// same signature, no matter how many times it is computed.
#[test]
fn test_signature_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                1u64..=u64::MAX,
                slug_strategy(),
                scope_strategy(),
                slug_strategy(),
                viewport_strategy(),
            ),
            |(user_id, workspace, scope, scope_id, viewport)| {
                let build = || {
                    Context::new(user_id, workspace.clone())
                        .with_scope(scope, scope_id.clone())
                        .with_viewport(viewport)
                };
                assert_eq!(build().signature(), build().signature());
                assert_eq!(build(), build());
                Ok(())
            },
        )
        .unwrap();
}

/// Test that any single differing field changes the signature for slug-safe
/// inputs, so two distinct slots never collide in storage.
#[test]
fn test_signature_field_sensitivity_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                1u64..=1_000_000u64,
                slug_strategy(),
                slug_strategy(),
                slug_strategy(),
                slug_strategy(),
            ),
            |(user_id, workspace_a, workspace_b, scope_id_a, scope_id_b)| {
                let base = Context::new(user_id, workspace_a.clone());

                if workspace_a != workspace_b {
                    let other = Context::new(user_id, workspace_b.clone());
                    assert_ne!(base.signature(), other.signature());
                }

                let inst_a = base
                    .clone()
                    .with_scope(ScopeType::Instance, scope_id_a.clone());
                if scope_id_a != scope_id_b {
                    let inst_b = base
                        .clone()
                        .with_scope(ScopeType::Instance, scope_id_b.clone());
                    assert_ne!(inst_a.signature(), inst_b.signature());
                }

                // Different user, same everything else
                let other_user = Context::new(user_id + 1, workspace_a.clone());
                assert_ne!(base.signature(), other_user.signature());

                // Different viewport, same everything else
                assert_ne!(
                    base.signature(),
                    base.clone().with_viewport(Viewport::Desktop).signature()
                );

                Ok(())
            },
        )
        .unwrap();
}
