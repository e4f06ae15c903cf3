mod auth_tests;
mod chat_tests;
mod health_tests;
mod listing_tests;
mod post_tests;
mod vote_tests;
