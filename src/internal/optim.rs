#[doc(hidden)]
#[inline(always)]
pub unsafe fn _assume(b: bool) {
    if !b {
        std::hint::unreachable_unchecked()
    }
}

macro_rules! assume {
    ($e:expr $(, $t:tt)*) => {
        if cfg!(debug_assertions) {
            assert!($e $(, $t)*)
        } else {
            $crate::internal::optim::_assume($e)
        }
    };
}

macro_rules! unreach {
    ($($t:tt)*) => {{
        if cfg!(debug_assertions) {
            unreachable!($($t)*)
        } else {
            std::hint::unreachable_unchecked()
        }
    }};
}
