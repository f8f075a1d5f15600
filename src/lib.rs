pub mod app;

pub mod event;

pub mod ui;

pub mod tui;

pub mod handler;

pub mod config;

pub mod notification;

pub mod device;

pub mod cli;

pub mod logging;

pub mod agent;

pub mod auth;

pub mod nm;

pub mod classify;

pub mod network;

pub mod error;

pub mod capability;

pub mod scan;

pub mod reconcile;

pub mod join;
