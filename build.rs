fn main() {
    // ESP-IDF sysenv propagation is only meaningful when building for
    // the target; host builds (tests, clippy) skip it entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
