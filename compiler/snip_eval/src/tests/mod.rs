//! Test modules for the operator, method, conversion and interpreter
//! implementations.

mod methods_tests;
