//! Common orchestration abstractions for the SDN controller.
//!
//! This crate provides the traits and types shared by orchestration
//! modules in the controller:
//!
//! - [`Orch`]: Base trait for orchestration agents
//! - [`Consumer`]: Ordered queue of pending events for an Orch
//! - [`TaskStatus`]: Result type for task processing
//!
//! # Architecture
//!
//! The orchestration architecture follows an event-driven model:
//!
//! 1. Collaborators (discovery, switch I/O) produce typed events
//! 2. The daemon feeds each event into the owning Orch's Consumer
//! 3. The Orch drains its Consumer in arrival order in `do_task()`
//! 4. Every event runs to completion before the next one is looked at
//!
//! # Example
//!
//! ```ignore
//! use sdn_orch_common::{Consumer, ConsumerConfig, Orch};
//!
//! struct MyOrch {
//!     events: Consumer<MyEvent>,
//! }
//!
//! #[async_trait]
//! impl Orch for MyOrch {
//!     fn name(&self) -> &str { "MyOrch" }
//!
//!     async fn do_task(&mut self) {
//!         for event in self.events.pop_batch() {
//!             if let Err(e) = self.process(event) {
//!                 log::error!("Failed: {}", e);
//!             }
//!         }
//!     }
//! }
//! ```

mod consumer;
mod orch;
mod task;

pub use consumer::{Consumer, ConsumerConfig};
pub use orch::Orch;
pub use task::{TaskError, TaskResult, TaskStatus};
