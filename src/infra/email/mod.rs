pub mod http_mailer;
