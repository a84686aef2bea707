use super::Matrix2;
use crate::prelude::*;
use std::ops::{AddAssign, Mul};

pub trait Dot<I> {
    type Output;
    fn dot(self, rhs: I) -> Result<Self::Output>;
}

pub trait Transpose {
    fn transpose(&self) -> Self;
}

impl<T: Default + Copy> Transpose for Matrix2<T> {
    fn transpose(&self) -> Self {
        let mut transposed = Matrix2::new(self.cols(), self.rows());

        for row in 0..self.rows() {
            for col in 0..self.cols() {
                transposed[(col, row)] = self[(row, col)];
            }
        }
        transposed
    }
}

/// Matrix-vector product. Each output entry sums `row[j] * rhs[j]` in
/// ascending `j`, starting from `T::default()`.
impl<'a, 'b, T> Dot<&'b [T]> for &'a Matrix2<T>
where
    T: Mul<Output = T> + Default + AddAssign + Copy,
{
    type Output = Vec<T>;
    fn dot(self, rhs: &'b [T]) -> Result<Self::Output> {
        if self.cols() != rhs.len() {
            return Err(Error::DimensionErr);
        }

        Ok((0..self.rows())
            .map(|row| {
                let mut sum = T::default();
                for (&w, &x) in self.row(row).iter().zip(rhs) {
                    sum += w * x;
                }
                sum
            })
            .collect())
    }
}
