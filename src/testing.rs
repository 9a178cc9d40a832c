//! Assertion helpers shared by the unit tests.

macro_rules! send {
    ([$($d:tt),*]) => {Sent::Data(vec![$($d,)*])};
    ($c:tt) => {Sent::Cmd($c)};
}
macro_rules! sends {
    ($($e:tt),*) => {&[$(send!($e),)*]};
}
