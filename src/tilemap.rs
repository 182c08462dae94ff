/// A bounds-checked 2D grid stored row-major, origin at the top-left.
///
/// Coordinates are signed so callers can probe positions left of or above
/// the map (ping rings, scrolled cameras) without casting first.
#[derive(Clone, Debug, PartialEq)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Build a map from row-major data. Returns `None` when the length does
    /// not match `width * height`.
    pub fn from_rows(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Index into the data array, or `None` outside [0,width)×[0,height).
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.index(x, y).map(|idx| &self.data[idx])
    }

    /// Store a value. Out-of-range writes are dropped and reported as `false`.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.data[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Swap the backing storage for freshly generated rows of the same size.
    pub fn replace(&mut self, other: Tilemap<T>) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.data = other.data;
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % self.width;
            let y = idx / self.width;
            (x, y, val)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set_inside_bounds() {
        let mut map = Tilemap::new_with(4, 3, 0u8);
        assert!(map.set(3, 2, 7));
        assert_eq!(map.get(3, 2), Some(&7));
        assert_eq!(map.get(0, 0), Some(&0));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut map = Tilemap::new_with(4, 3, 0u8);
        assert_eq!(map.get(4, 0), None);
        assert_eq!(map.get(0, 3), None);
        assert_eq!(map.get(-1, 0), None);
        assert!(!map.set(-1, 2, 9));
        assert!(!map.set(4, 2, 9));
        assert!(map.iter().all(|(_, _, &v)| v == 0));
    }

    #[test]
    fn test_no_horizontal_wrap() {
        let mut map = Tilemap::new_with(4, 3, 0u8);
        map.set(0, 1, 5);
        // Column 4 on row 0 must not alias column 0 on row 1
        assert_eq!(map.get(4, 0), None);
    }

    #[test]
    fn test_from_rows_checks_length() {
        assert!(Tilemap::from_rows(2, 2, vec![1, 2, 3]).is_none());
        let map = Tilemap::from_rows(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(map.get(1, 1), Some(&4));
        assert_eq!(map.get(0, 1), Some(&3));
    }
}
