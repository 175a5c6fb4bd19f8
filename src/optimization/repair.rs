use nalgebra::DVector;

#[derive(Debug, Clone, PartialEq)]
pub enum BoundsRepair {
    Clamp,   // Move out-of-bounds values onto the nearest bound
    Reflect, // Mirror out-of-bounds values back into the box
    None,
}

impl BoundsRepair {
    pub fn repair(&self, values: &mut DVector<f64>, lower: &DVector<f64>, upper: &DVector<f64>) {
        match self {
            BoundsRepair::Clamp => {
                for (i, value) in values.iter_mut().enumerate() {
                    if *value > upper[i] {
                        *value = upper[i];
                    }
                    if *value < lower[i] {
                        *value = lower[i];
                    }
                }
            }

            // Warning: values further than one width out of bounds fall back to clamping
            BoundsRepair::Reflect => {
                for (i, value) in values.iter_mut().enumerate() {
                    if *value > upper[i] {
                        *value = upper[i] - (*value - upper[i]);
                    } else if *value < lower[i] {
                        *value = lower[i] + (lower[i] - *value);
                    }

                    *value = value.clamp(lower[i], upper[i]);
                }
            }

            BoundsRepair::None => {}
        }
    }
}
