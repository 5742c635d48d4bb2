// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

// Token lifetime and login hardening
pub const DEFAULT_TOKEN_EXPIRE_MINUTES: u64 = 30;
pub const DEFAULT_LOGIN_MIN_MILLIS: u64 = 100;
pub const TOKEN_TYPE: &str = "bearer";
pub const MAX_TOKEN_LENGTH: usize = 2048;

// Pagination
pub const DEFAULT_PAGE_LIMIT: usize = 100;
pub const MAX_PAGE_LIMIT: usize = 1000;

// Input validation
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_SECRET_LENGTH: usize = 32;
