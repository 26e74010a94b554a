//! Authentication

mod cookie;
mod token;

pub use cookie::CookieTokenProvider;
pub use cookie::DEFAULT_TOKEN_COOKIE;
pub use cookie::cookie_value;
pub use token::AccessToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
