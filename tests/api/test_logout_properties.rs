//! Every logout response expires the session cookie, whatever the token looks like.

use proptest::prelude::*;

use crate::support::{assert_session_cleared, logout, setup_test_app};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().enable_all().build().expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_session_token_is_cleared(token in "[A-Za-z0-9_\\-]{1,128}", seeded in any::<bool>()) {
        runtime().block_on(async {
            let app = setup_test_app();
            if seeded {
                app.seed_session(&token).await;
            }

            let cookie = format!("session={}", token);
            let response = logout(&app, Some(&cookie)).await;

            assert_eq!(response.status(), axum::http::StatusCode::OK);
            assert_session_cleared(&response);
            assert!(!app.has_session(&token).await);
        });
    }
}
