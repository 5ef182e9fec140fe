pub mod credentials;
pub mod gate;

pub use credentials::{
    session_cookies, OperatorCredentials, PresentedCredentials, PASSWORD_COOKIE, USERNAME_COOKIE,
};
pub use gate::{require_operator, CredentialGate};
