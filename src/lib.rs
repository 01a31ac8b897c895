pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub mod crypto {
    pub mod aes;
}

pub mod models {
    pub mod credential;
    pub mod session;
}

pub mod services {
    pub mod cookie;
    pub mod pod;
    pub mod session;
}

pub mod handlers {
    pub mod auth;
    pub mod pod;
    pub mod products;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod auth;
}
