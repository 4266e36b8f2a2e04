//! A small min-cost maximum flow network, rebuilt for every curriculum solve.
mod flow_graph;

pub use flow_graph::*;
