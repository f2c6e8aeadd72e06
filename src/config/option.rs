/// Details of a configuration option.
#[derive(Clone)]
pub struct ConfigOption<T> {
    /// The name used to identify the option.
    pub name: &'static str,

    /// The minimum value of the option.
    pub min: T,

    /// The maximum value of the option.
    pub max: T,

    /// The value of the option.
    pub value: T,
}

impl<T: Clone> ConfigOption<T> {
    /// Return the limits of the option as a (min, max) pair.
    pub fn min_max(&self) -> (T, T) {
        (self.min.clone(), self.max.clone())
    }
}

impl<T: Clone + PartialOrd> ConfigOption<T> {
    /// Sets the value of the option, if within limits.
    pub fn set(&mut self, value: T) -> Result<(), ()> {
        if self.min <= value && value <= self.max {
            self.value = value;
            Ok(())
        } else {
            Err(())
        }
    }
}
