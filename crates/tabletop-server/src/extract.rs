//! Request extractors whose rejections render as `{"error": msg}` bodies.
//!
//! Each wrapper delegates to the axum extractor of the same name and routes
//! its rejection through [`ServerError`].

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ServerError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(ServerError))]
pub struct AppForm<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServerError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServerError))]
pub struct AppQuery<T>(pub T);
