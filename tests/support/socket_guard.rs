//! Skips wiremock-backed tests on hosts that cannot bind a localhost port.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

/// Set to `1`/`true`/`yes` to turn a skipped socket test into a failure (CI).
const STRICT_ENV: &str = "LOCALIZER_REQUIRE_SOCKET_TESTS";

fn strict_mode() -> bool {
    std::env::var(STRICT_ENV).is_ok_and(|value| {
        ["1", "true", "yes"]
            .iter()
            .any(|on| value.eq_ignore_ascii_case(on))
    })
}

fn loopback_available() -> bool {
    TcpListener::bind(("127.0.0.1", 0)).is_ok()
}

/// Starts a mock image host, or returns `None` (after a note on stderr) when
/// loopback sockets are unavailable. Panics instead in strict mode.
#[track_caller]
pub fn mock_image_host() -> impl std::future::Future<Output = Option<MockServer>> {
    let caller = Location::caller();
    let available = loopback_available();
    if !available {
        let note = format!(
            "{}:{}: no loopback socket, mock image host unavailable",
            caller.file(),
            caller.line()
        );
        assert!(!strict_mode(), "{note} ({STRICT_ENV} is set)");
        eprintln!("{note}; test skipped (set {STRICT_ENV}=1 to fail instead)");
    }
    async move {
        if available {
            Some(MockServer::start().await)
        } else {
            None
        }
    }
}
