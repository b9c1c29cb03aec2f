mod container_test;
mod helpers;
mod me;
mod refresh_token;
mod sign_in;
mod sign_up;
mod verification;
