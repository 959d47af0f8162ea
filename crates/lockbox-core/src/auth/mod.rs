mod authorize;
mod browser;
mod callback;
mod classify;
mod error;
mod html;
mod login;
mod options;

pub use authorize::fetch_auth_url;
pub use browser::{launch_command, open_url, LaunchCommand, Platform};
pub use classify::{
    classify, ClassifiedError, ERR_LOGIN_FAILED, ERR_NO_RESPONSE, ERR_TOKEN_VERIFICATION,
};
pub use error::AuthError;
pub use html::{error_html, SUCCESS_HTML};
pub use login::login;
pub use options::{
    LoginOptions, CALLBACK_PATH, DEFAULT_CALLBACK_HOST, DEFAULT_CALLBACK_METHOD,
    DEFAULT_LISTEN_ADDRESS, DEFAULT_MOUNT, DEFAULT_PORT,
};
