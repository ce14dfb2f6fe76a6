pub mod http_helpers;
