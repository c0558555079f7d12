pub mod parallel;
pub mod unit;

pub use parallel::{compile_file, parallel_compile, CompiledFile};
pub use unit::{CompilationUnit, EmitKind};
