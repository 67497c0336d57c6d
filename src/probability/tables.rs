//! Fixed per-competitor coefficients and food affinity tables.
//!
//! Competitor ids run 1..=20 and food ids 1..=40; both tables are indexed
//! with `id - 1`.

/// Number of distinct competitors across all arenas.
pub const COMPETITOR_COUNT: usize = 20;

/// Number of distinct foods that can be served in an arena.
pub const FOOD_COUNT: usize = 40;

/// Favorite food weights per competitor.
#[rustfmt::skip]
pub const FAVORITE_FOODS: [[u8; FOOD_COUNT]; COMPETITOR_COUNT] = [
    [2, 0, 0, 1, 0, 1, 1, 1, 0, 1, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0], // 1
    [1, 0, 0, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1, 0, 0, 0, 0], // 2
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0, 0, 1, 0, 0, 1], // 3
    [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1], // 4
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 1, 1, 0], // 5
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0], // 6
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 0, 0, 0, 1, 0, 0], // 7
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 0, 0, 1, 1, 0, 0], // 8
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1], // 9
    [0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0], // 10
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 1], // 11
    [1, 0, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0], // 12
    [1, 0, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0], // 13
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0], // 14
    [1, 0, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0], // 15
    [1, 0, 0, 1, 0, 1, 1, 1, 0, 2, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0], // 16
    [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 2, 1, 1, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 2], // 17
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 1, 1, 0, 1, 1, 0, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0], // 18
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0], // 19
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0], // 20
];

/// Allergy food weights per competitor.
#[rustfmt::skip]
pub const ALLERGY_FOODS: [[u8; FOOD_COUNT]; COMPETITOR_COUNT] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0], // 1
    [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1], // 2
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 3
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1], // 4
    [0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0], // 5
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0], // 6
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0], // 7
    [1, 0, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0], // 8
    [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0], // 9
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], // 10
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0], // 11
    [0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0], // 12
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 1, 1, 0], // 13
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0], // 14
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0], // 15
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0], // 16
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0], // 17
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 1, 1, 0], // 18
    [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0], // 19
    [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0], // 20
];

/// Regression coefficients for a single competitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogitCoefficients {
    pub intercept: f64,
    /// Applied to the favorite food count.
    pub favorite: f64,
    /// Applied to the (non-positive) allergy count.
    pub allergy: f64,
    /// Positional terms for slots 2, 3 and 4. Slot 1 is the baseline.
    pub slot: [f64; 3],
}

#[rustfmt::skip]
pub const LOGIT_COEFFICIENTS: [LogitCoefficients; COMPETITOR_COUNT] = [
    LogitCoefficients { intercept: -0.5578797209020812, favorite: 0.1504905442950007, allergy: 0.44829854522257373, slot: [0.03429419760004175, 0.3092282470680153, 0.48811138882862903] }, // 1
    LogitCoefficients { intercept: -2.3816473307447232, favorite: 0.2531486445207378, allergy: 0.31415566466948475, slot: [0.09041359948052288, 0.4655924180505679, 0.6967019333927604] }, // 2
    LogitCoefficients { intercept: -3.408503139382834, favorite: 0.2321103324697762, allergy: 0.29032610878400084, slot: [0.23083014330300766, 0.5730561884025372, 0.7969444280970022] }, // 3
    LogitCoefficients { intercept: -1.4508928654201572, favorite: 0.18713226191708446, allergy: 0.5320375083770186, slot: [0.2874169253807672, 0.5725473111008886, 0.8682858739862767] }, // 4
    LogitCoefficients { intercept: -1.8202133158422773, favorite: 0.2615804517882756, allergy: 0.3567352676676174, slot: [0.21038894660290797, 0.5046797635697318, 0.7526893898825266] }, // 5
    LogitCoefficients { intercept: -2.4613830265184764, favorite: 0.28597652462093764, allergy: 0.3787506148667497, slot: [0.23387176794837566, 0.3695549563348381, 0.6932109800729531] }, // 6
    LogitCoefficients { intercept: -2.3079949843348704, favorite: 0.2432710227007538, allergy: 0.29108385342486015, slot: [0.3685800188509685, 0.6067212683175645, 0.8464371564480998] }, // 7
    LogitCoefficients { intercept: -2.934665243422152, favorite: 0.288969073858643, allergy: 0.2930170316394068, slot: [-0.018429043568728678, 0.21005915395134087, 0.6116666889341296] }, // 8
    LogitCoefficients { intercept: -3.8945990049912256, favorite: 0.36218239945488984, allergy: 0.23741679477916844, slot: [0.20641526079920008, 0.5411383161760385, 1.0102250787853437] }, // 9
    LogitCoefficients { intercept: -3.4973214669237294, favorite: 0.22761681762365243, allergy: 0.3547806613431836, slot: [0.421802212823246, 0.8200385942630342, 1.0120989023512692] }, // 10
    LogitCoefficients { intercept: -3.1139646807925994, favorite: 0.16483573602534698, allergy: 0.42592418561193834, slot: [0.584613155004644, 0.6494667925507648, 1.0976098133659882] }, // 11
    LogitCoefficients { intercept: -2.3110148236404755, favorite: 0.22236679235987714, allergy: 0.4606426831762092, slot: [0.3347726570486548, 0.5600787227660936, 0.9806328208591978] }, // 12
    LogitCoefficients { intercept: -1.6338387450749083, favorite: 0.22343118054005098, allergy: 0.4735258538040338, slot: [0.3419735290394779, 0.5419822910230638, 0.9055205948235535] }, // 13
    LogitCoefficients { intercept: -2.5739540967295578, favorite: 0.25324711454564514, allergy: 0.3410753124772514, slot: [0.2405143932563621, 0.4565731916308943, 0.7279610425229587] }, // 14
    LogitCoefficients { intercept: 0.0, favorite: 0.2778707661218333, allergy: 0.4940017761967063, slot: [0.14120384949873804, 0.40863655490641776, 0.5425059013402355] }, // 15
    LogitCoefficients { intercept: -1.2411338661858178, favorite: 0.18479111307345844, allergy: 0.42720006106472436, slot: [0.047423237638579925, 0.31500675602167555, 0.6823443615601946] }, // 16
    LogitCoefficients { intercept: -1.105254165262948, favorite: 0.16136278168925386, allergy: 0.4707881547790502, slot: [0.10306224851649924, 0.2538973699664126, 0.5519879585215964] }, // 17
    LogitCoefficients { intercept: -2.220565865397232, favorite: 0.1833797048239287, allergy: 0.45847099150186704, slot: [0.36042855598351886, 0.6688681898395414, 0.9501583099495318] }, // 18
    LogitCoefficients { intercept: -0.5537779446248267, favorite: 0.2732663841768408, allergy: 0.4205628073099468, slot: [0.19214520350035752, 0.5144414675041572, 0.74222452433783] }, // 19
    LogitCoefficients { intercept: -1.5567223525727913, favorite: 0.27679359966203076, allergy: 0.37475352079020346, slot: [0.07406792006773114, 0.5319601064873686, 0.8196983477882641] }, // 20
];

fn lookup<T>(rows: &[T], id: u32) -> Option<&T> {
    let index = usize::try_from(id).ok()?.checked_sub(1)?;
    rows.get(index)
}

/// Favorite weight of `food` for `competitor`, 0 for unknown ids.
pub fn favorite_weight(competitor: u32, food: u32) -> u8 {
    lookup(&FAVORITE_FOODS, competitor)
        .and_then(|row| lookup(row, food))
        .copied()
        .unwrap_or(0)
}

/// Allergy weight of `food` for `competitor`, 0 for unknown ids.
pub fn allergy_weight(competitor: u32, food: u32) -> u8 {
    lookup(&ALLERGY_FOODS, competitor)
        .and_then(|row| lookup(row, food))
        .copied()
        .unwrap_or(0)
}

pub fn logit_coefficients(competitor: u32) -> Option<&'static LogitCoefficients> {
    lookup(&LOGIT_COEFFICIENTS, competitor)
}
