// Business logic service implementations

pub mod classifier;
pub mod health;
pub mod normalizer;
pub mod reconciler;
pub mod signature;
pub mod webhook_service;
