mod generate_test;
mod health_test;
mod middleware_test;
mod sessions_test;
mod versions_test;
