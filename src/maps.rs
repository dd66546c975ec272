/// One step of a scalar map: current state plus fixed parameter in,
/// next state out.
pub trait IteratedMap {
    fn advance(&self, r: f64, x: f64) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogisticMap {
    /// `r * x * (1 - x)`
    Continuous,
    /// `floor(4 * x * (1 - x))`, ignores `r`
    Floor,
}

impl LogisticMap {
    pub fn label(&self) -> &'static str {
        match self {
            LogisticMap::Continuous => "continuous",
            LogisticMap::Floor => "floor",
        }
    }
}

impl IteratedMap for LogisticMap {
    fn advance(&self, r: f64, x: f64) -> f64 {
        match self {
            LogisticMap::Continuous => r * x * (1.0 - x),
            LogisticMap::Floor => (4.0 * x * (1.0 - x)).floor(),
        }
    }
}
