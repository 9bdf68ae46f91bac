#![allow(dead_code)]

pub mod plan;
