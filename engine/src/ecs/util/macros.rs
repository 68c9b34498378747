/// Invoke `$m` for a tuple arity and every shorter suffix of it.
#[macro_export]
macro_rules! for_each_tuple {
    ($m:ident !! $head_ty:ident) => {
        $m!($head_ty);
    };
    ($m:ident !! $head_ty:ident, $($tail_ty:ident),*) => (
        $m!($head_ty, $( $tail_ty ),*);
        $crate::for_each_tuple!($m !! $( $tail_ty ),*);
    );
}

/// Apply a macro to every tuple arity from 1 up to 16 elements.
#[macro_export]
macro_rules! all_tuples {
    ($m:ident) => {
        $crate::for_each_tuple!($m !! A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P);
    };
}

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    struct Arity<Params>(PhantomData<Params>);

    macro_rules! arity_impl {
        ($($name: ident),*) => {
            #[allow(dead_code)]
            impl<$($name),*> Arity<($($name,)*)> {
                const LEN: usize = [$(stringify!($name)),*].len();
            }
        }
    }

    all_tuples!(arity_impl);

    #[test]
    fn every_arity_is_generated() {
        assert_eq!(Arity::<(u8,)>::LEN, 1);
        assert_eq!(Arity::<(u8, u16, u32)>::LEN, 3);
        assert_eq!(
            Arity::<(
                u8,
                u8,
                u8,
                u8,
                u8,
                u8,
                u8,
                u8,
                u8,
                u8,
                u8,
                u8,
                u8,
                u8,
                u8,
                u8
            )>::LEN,
            16
        );
    }
}
