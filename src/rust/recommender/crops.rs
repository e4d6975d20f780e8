use std::fmt;

use serde::Serialize;

/// A crop the classifier was trained to recommend.
///
/// The discriminant is the classifier's integer label. The mapping is fixed by
/// the training data and must stay in sync with the exported model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum Crop {
    Rice = 1,
    Maize = 2,
    Jute = 3,
    Cotton = 4,
    Coconut = 5,
    Papaya = 6,
    Orange = 7,
    Apple = 8,
    Muskmelon = 9,
    Watermelon = 10,
    Grapes = 11,
    Mango = 12,
    Banana = 13,
    Pomegranate = 14,
    Lentil = 15,
    Blackgram = 16,
    Mungbean = 17,
    Mothbeans = 18,
    Pigeonpeas = 19,
    Kidneybeans = 20,
    Chickpea = 21,
    Coffee = 22,
}

impl Crop {
    /// Every supported crop, in label order.
    pub const ALL: [Crop; 22] = [
        Crop::Rice,
        Crop::Maize,
        Crop::Jute,
        Crop::Cotton,
        Crop::Coconut,
        Crop::Papaya,
        Crop::Orange,
        Crop::Apple,
        Crop::Muskmelon,
        Crop::Watermelon,
        Crop::Grapes,
        Crop::Mango,
        Crop::Banana,
        Crop::Pomegranate,
        Crop::Lentil,
        Crop::Blackgram,
        Crop::Mungbean,
        Crop::Mothbeans,
        Crop::Pigeonpeas,
        Crop::Kidneybeans,
        Crop::Chickpea,
        Crop::Coffee,
    ];

    /// Looks up the crop for a classifier label. Returns `None` for labels
    /// outside `1..=22`.
    pub fn from_label(label: i64) -> Option<Crop> {
        if !(1..=Self::ALL.len() as i64).contains(&label) {
            return None;
        }
        Some(Self::ALL[(label - 1) as usize])
    }

    pub fn label(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            Crop::Rice => "Rice",
            Crop::Maize => "Maize",
            Crop::Jute => "Jute",
            Crop::Cotton => "Cotton",
            Crop::Coconut => "Coconut",
            Crop::Papaya => "Papaya",
            Crop::Orange => "Orange",
            Crop::Apple => "Apple",
            Crop::Muskmelon => "Muskmelon",
            Crop::Watermelon => "Watermelon",
            Crop::Grapes => "Grapes",
            Crop::Mango => "Mango",
            Crop::Banana => "Banana",
            Crop::Pomegranate => "Pomegranate",
            Crop::Lentil => "Lentil",
            Crop::Blackgram => "Blackgram",
            Crop::Mungbean => "Mungbean",
            Crop::Mothbeans => "Mothbeans",
            Crop::Pigeonpeas => "Pigeonpeas",
            Crop::Kidneybeans => "Kidneybeans",
            Crop::Chickpea => "Chickpea",
            Crop::Coffee => "Coffee",
        }
    }
}

impl From<Crop> for &'static str {
    fn from(crop: Crop) -> Self {
        crop.name()
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
