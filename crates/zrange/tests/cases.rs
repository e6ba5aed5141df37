//! Fixed decomposition scenarios checked across every supported word width.
#[cfg(test)]
mod tests {
    use zrange::{CurveWord, Fragment, ZCurve, error};

    /// Decompose a rectangle with word type `T`, widening the result to `u128`.
    fn decompose_as<T>(bits: u32, rect: [u16; 4]) -> error::Result<(Vec<(u128, u128)>, u64)>
    where
        T: CurveWord + From<u16>,
    {
        let z = ZCurve::<T>::new(bits)?;
        let [xlo, ylo, xhi, yhi] = rect.map(<T as From<u16>>::from);
        let found = z.fragments(&z.query(xlo, ylo, xhi, yhi)?);
        let pairs = found
            .iter()
            .map(|f| (f.lo().to_u128(), f.hi().to_u128()))
            .collect();
        Ok((pairs, found.visits))
    }

    macro_rules! decompose_cases {
        ($(($name:ident, $bits:expr, $rect:expr, [$(($lo:expr, $hi:expr)),* $(,)?])),* $(,)?) => {
            $(
                paste::paste! {
                    #[test]
                    fn [<$name _fragments>]() -> error::Result<()> {
                        let expected: Vec<(u128, u128)> = vec![$(($lo, $hi)),*];
                        let (found, visits) = decompose_as::<u32>($bits, $rect)?;
                        assert_eq!(found, expected, "{} fragments", stringify!($name));
                        assert!(visits >= 1);
                        Ok(())
                    }

                    #[test]
                    fn [<$name _width_independent>]() -> error::Result<()> {
                        let reference = decompose_as::<u16>($bits, $rect)?;
                        assert_eq!(decompose_as::<u32>($bits, $rect)?, reference);
                        assert_eq!(decompose_as::<u64>($bits, $rect)?, reference);
                        assert_eq!(decompose_as::<u128>($bits, $rect)?, reference);
                        Ok(())
                    }
                }
            )*
        };
    }

    decompose_cases! {
        (full_domain_2, 2, [0, 0, 3, 3], [(0, 15)]),
        (aligned_quadrant_2, 2, [0, 0, 1, 1], [(0, 3)]),
        (straddling_center_2, 2, [1, 1, 2, 2], [(3, 3), (6, 6), (9, 9), (12, 12)]),
        (left_column_2, 2, [0, 0, 1, 3], [(0, 3), (8, 11)]),
        (bottom_row_2, 2, [0, 0, 3, 0], [(0, 1), (4, 5)]),
        (corner_point_2, 2, [3, 3, 3, 3], [(15, 15)]),
        (bottom_half_3, 3, [0, 0, 7, 3], [(0, 31)]),
        (right_half_3, 3, [4, 0, 7, 7], [(16, 31), (48, 63)]),
        (top_right_quadrant_3, 3, [4, 4, 7, 7], [(48, 63)]),
        (full_domain_8, 8, [0, 0, 255, 255], [(0, 65535)]),
    }

    #[test]
    fn fragment_count_grows_with_misalignment() -> error::Result<()> {
        let z = ZCurve::<u32>::new(4)?;
        let aligned = z.fragments(&z.query(4, 4, 11, 11)?);
        let shifted = z.fragments(&z.query(5, 5, 12, 12)?);
        assert_eq!(aligned.point_count(), shifted.point_count());
        assert!(shifted.len() > aligned.len());
        assert!(shifted.visits > aligned.visits);
        Ok(())
    }

    #[test]
    fn visitor_sees_every_fragment_once() -> error::Result<()> {
        let z = ZCurve::<u64>::new(5)?;
        let q = z.query(3, 9, 20, 27)?;
        let mut calls = 0u32;
        let mut covered = 0u128;
        let visits = z.decompose(&q, &mut |f: Fragment<u64>| {
            calls += 1;
            covered += f.size();
        });
        let collected = z.fragments(&q);
        assert_eq!(calls as usize, collected.len());
        assert_eq!(covered, q.point_count());
        assert_eq!(visits, collected.visits);
        Ok(())
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        assert!(matches!(
            ZCurve::<u16>::new(9),
            Err(error::Error::InvalidBitWidth { bits: 9, max: 8 })
        ));
        assert!(ZCurve::<u32>::new(0).is_err());
        let z = ZCurve::<u32>::new(4).expect("valid width");
        assert!(matches!(
            z.query(0, 5, 3, 4),
            Err(error::Error::InvalidRectangle { .. })
        ));
    }
}
