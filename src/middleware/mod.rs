//! Middleware for request processing.
//!
//! # Authorization Flow
//!
//! 1. Client sends a request with an `Authorization: Bearer <token>` header
//! 2. The scope middleware validates the token signature and expiry
//! 3. The token subject is re-checked against the credential store (a live
//!    check — a token must not outlive the deletion of its identity)
//! 4. The scopes claim is normalized and tested against the route group's
//!    required scope
//! 5. The verified [`auth::AuthUser`] is attached to the request and the
//!    inner handler runs
//!
//! Each request is evaluated independently; outcomes are never cached and
//! nothing in this path retries.

pub mod auth;
