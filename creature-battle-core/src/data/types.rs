use serde::Deserialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
pub enum Type {
    Normal,
    Grass,
    Water,
    Fire,
    Electric,
    Ground,
    Flying,
    Ice,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Category {
    Physical,
    Special,
    Status,
}

/// Damage multiplier per (attacking, defending) type pair.
/// Row is the attacker, column is the defender.
#[rustfmt::skip]
const MATRIX: [[f32; 8]; 8] = [
    //            Norm  Grass Water Fire  Elec  Grnd  Fly   Ice
    /* Norm  */  [1.0,  1.0,  1.0,  1.0,  1.0,  1.0,  1.0,  1.0],
    /* Grass */  [1.0,  0.5,  2.0,  0.5,  1.0,  2.0,  0.5,  1.0],
    /* Water */  [1.0,  0.5,  0.5,  2.0,  1.0,  2.0,  1.0,  1.0],
    /* Fire  */  [1.0,  2.0,  0.5,  0.5,  1.0,  1.0,  1.0,  2.0],
    /* Elec  */  [1.0,  0.5,  2.0,  1.0,  0.5,  0.0,  2.0,  1.0],
    /* Grnd  */  [1.0,  0.5,  1.0,  2.0,  2.0,  1.0,  0.0,  1.0],
    /* Fly   */  [1.0,  2.0,  1.0,  1.0,  0.5,  1.0,  1.0,  1.0],
    /* Ice   */  [1.0,  2.0,  0.5,  1.0,  1.0,  2.0,  2.0,  0.5],
];

/// Damage multiplier when attacking a certain type.
pub fn affinity(attacker: Type, defender: Type) -> f32 {
    MATRIX[attacker as usize][defender as usize]
}

/// Combined multiplier against a defender's one or two types.
/// An absent secondary type contributes a neutral 1.
pub fn affinity_dual(attacker: Type, primary: Type, secondary: Option<Type>) -> f32 {
    affinity(attacker, primary) * secondary.map_or(1.0, |t| affinity(attacker, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_spot_values() {
        assert_eq!(affinity(Type::Electric, Type::Ground), 0.0);
        assert_eq!(affinity(Type::Fire, Type::Grass), 2.0);
        assert_eq!(affinity(Type::Water, Type::Water), 0.5);
        assert_eq!(affinity(Type::Normal, Type::Ice), 1.0);
    }

    #[test]
    fn dual_affinity_multiplies_both_types() {
        // Ice vs Grass/Flying: 2.0 * 2.0
        assert_eq!(affinity_dual(Type::Ice, Type::Grass, Some(Type::Flying)), 4.0);
        // missing secondary type is neutral
        assert_eq!(affinity_dual(Type::Fire, Type::Grass, None), 2.0);
        // one immunity zeroes the product
        assert_eq!(affinity_dual(Type::Ground, Type::Fire, Some(Type::Flying)), 0.0);
    }
}
