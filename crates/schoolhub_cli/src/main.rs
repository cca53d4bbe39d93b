//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `schoolhub_core` linkage without the Flutter/FFI runtime.
//! - Print the role and screen set each built-in account resolves to, using
//!   process-local storage so nothing is written to disk.

use schoolhub_core::{CredentialDirectory, InMemoryKvRepository, SessionRouter};

const DEMO_SECRET: &str = "password123";

fn main() {
    println!("schoolhub_core ping={}", schoolhub_core::ping());
    println!("schoolhub_core version={}", schoolhub_core::core_version());

    let mut router = SessionRouter::new(InMemoryKvRepository::new());
    router.restore_session();
    println!("signed_out screen_set={}", router.screen_set());

    for address in CredentialDirectory::builtin().addresses() {
        match router.resolve_credentials(address, DEMO_SECRET) {
            Ok(identity) => {
                let screens: Vec<&str> = router
                    .screen_set()
                    .screens()
                    .iter()
                    .map(|screen| screen.route())
                    .collect();
                println!(
                    "account={} role={} screen_set={} screens={}",
                    address,
                    identity.role,
                    router.screen_set(),
                    screens.join(",")
                );
            }
            Err(err) => println!("account={address} error={err}"),
        }
        router.sign_out();
    }
}
