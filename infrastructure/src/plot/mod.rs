//! Plot execution adapters

mod python;

pub use python::PythonPlotExecutor;
