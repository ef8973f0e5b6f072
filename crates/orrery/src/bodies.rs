//! Body registry: static descriptive data for every rendered celestial body.
//!
//! Sizes, distances and angular rates are cosmetic scene units, not physical
//! values. Rates are radians per frame at speed multiplier 1.

use crate::error::{OrreryError, Result};

/// Identity of a body. Doubles as the O(1) index into [`BodyRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyId {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

pub const BODY_COUNT: usize = 11;

impl BodyId {
    pub const ALL: [BodyId; BODY_COUNT] = [
        BodyId::Sun,
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Earth,
        BodyId::Moon,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
        BodyId::Uranus,
        BodyId::Neptune,
        BodyId::Pluto,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<BodyId> {
        Self::ALL.get(index).copied()
    }
}

/// Where a body sits in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// The central star. Spins in place at the origin.
    Star,
    /// Orbits the world origin.
    Planet,
    /// Orbits its parent body's position, at a rate not scaled by the speed multiplier.
    Satellite { parent: BodyId },
}

/// Flat ring around a body, in the body's orbital plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSpec {
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Image name for the ring surface (without directory or extension).
    pub texture: &'static str,
}

/// Immutable description of one body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDescriptor {
    pub id: BodyId,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: BodyKind,
    pub mean_radius: f32,
    /// Distance from the orbit pivot. For satellites, relative to the parent body.
    pub orbital_distance: f32,
    /// Revolution rate of the orbit pivot.
    pub orbital_rate: f32,
    /// Spin rate of the body mesh about its own axis.
    pub spin_rate: f32,
    pub ring: Option<RingSpec>,
    /// Case-insensitive substring of the body's texture identifier.
    pub texture_key: &'static str,
}

impl BodyDescriptor {
    pub fn is_pickable(&self) -> bool {
        !matches!(self.kind, BodyKind::Star)
    }
}

// ── Data ─────────────────────────────────────────────────────────────

fn planet(
    id: BodyId,
    name: &'static str,
    description: &'static str,
    mean_radius: f32,
    orbital_distance: f32,
    orbital_rate: f32,
    spin_rate: f32,
    texture_key: &'static str,
) -> BodyDescriptor {
    BodyDescriptor {
        id,
        name,
        description,
        kind: BodyKind::Planet,
        mean_radius,
        orbital_distance,
        orbital_rate,
        spin_rate,
        ring: None,
        texture_key,
    }
}

fn default_bodies() -> [BodyDescriptor; BODY_COUNT] {
    [
        BodyDescriptor {
            id: BodyId::Sun,
            name: "Sun",
            description: "The star at the centre of the Solar System.",
            kind: BodyKind::Star,
            mean_radius: 15.0,
            orbital_distance: 0.0,
            orbital_rate: 0.0,
            spin_rate: 0.004,
            ring: None,
            texture_key: "sun",
        },
        planet(BodyId::Mercury, "Mercury", "The closest planet to the Sun.", 3.2, 28.0, 0.004, 0.004, "mercury"),
        planet(BodyId::Venus, "Venus", "The hottest planet in the Solar System.", 5.8, 44.0, 0.015, 0.002, "venus"),
        planet(BodyId::Earth, "Earth", "The only planet known to support life.", 6.0, 62.0, 0.01, 0.02, "earth"),
        BodyDescriptor {
            id: BodyId::Moon,
            name: "Moon",
            description: "Earth's only natural satellite.",
            kind: BodyKind::Satellite { parent: BodyId::Earth },
            mean_radius: 1.7,
            orbital_distance: 8.0,
            orbital_rate: 0.01,
            spin_rate: 0.0,
            ring: None,
            texture_key: "moon",
        },
        planet(BodyId::Mars, "Mars", "Known as the Red Planet.", 4.0, 78.0, 0.008, 0.018, "mars"),
        planet(BodyId::Jupiter, "Jupiter", "The largest planet in the Solar System.", 12.0, 100.0, 0.002, 0.04, "jupiter"),
        BodyDescriptor {
            ring: Some(RingSpec { inner_radius: 10.0, outer_radius: 20.0, texture: "saturn_ring" }),
            ..planet(BodyId::Saturn, "Saturn", "Famous for its stunning ring system.", 10.0, 138.0, 0.0009, 0.038, "saturn")
        },
        BodyDescriptor {
            ring: Some(RingSpec { inner_radius: 7.0, outer_radius: 12.0, texture: "uranus_ring" }),
            ..planet(BodyId::Uranus, "Uranus", "An ice giant with a tilted axis.", 7.0, 176.0, 0.0004, 0.03, "uranus")
        },
        planet(BodyId::Neptune, "Neptune", "The farthest planet from the Sun.", 7.0, 200.0, 0.0001, 0.032, "neptune"),
        planet(BodyId::Pluto, "Pluto", "A dwarf planet in the Kuiper Belt.", 2.8, 216.0, 0.0007, 0.008, "pluto"),
    ]
}

/// Table of body descriptors indexed by [`BodyId`].
#[derive(Debug, Clone)]
pub struct BodyRegistry {
    bodies: [BodyDescriptor; BODY_COUNT],
}

impl BodyRegistry {
    /// The Solar System as shown by the orrery: one star, nine orbiting bodies, one moon.
    pub fn solar_system() -> Self {
        Self { bodies: default_bodies() }
    }

    #[inline]
    pub fn get(&self, id: BodyId) -> &BodyDescriptor {
        &self.bodies[id.index()]
    }

    /// Look up a body by display name, ignoring case.
    pub fn by_name(&self, name: &str) -> Result<&BodyDescriptor> {
        self.bodies
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| OrreryError::UnknownBody(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyDescriptor> {
        self.bodies.iter()
    }

    pub fn star(&self) -> &BodyDescriptor {
        self.get(BodyId::Sun)
    }

    /// Bodies orbiting the world origin, in registry order.
    pub fn planets(&self) -> impl Iterator<Item = &BodyDescriptor> {
        self.bodies.iter().filter(|b| b.kind == BodyKind::Planet)
    }

    pub fn satellites(&self) -> impl Iterator<Item = &BodyDescriptor> {
        self.bodies
            .iter()
            .filter(|b| matches!(b.kind, BodyKind::Satellite { .. }))
    }

    /// Resolve a texture identifier (URL or path) back to a body by
    /// case-insensitive substring match on `texture_key`.
    ///
    /// Picking does not use this; meshes carry their [`BodyId`] directly.
    /// When several keys match, the longest one wins so "mars" beats a
    /// hypothetical "mar".
    pub fn find_by_texture(&self, identifier: &str) -> Option<&BodyDescriptor> {
        let haystack = identifier.to_ascii_lowercase();
        self.bodies
            .iter()
            .filter(|b| haystack.contains(&b.texture_key.to_ascii_lowercase()))
            .max_by_key(|b| b.texture_key.len())
    }
}

impl Default for BodyRegistry {
    fn default() -> Self {
        Self::solar_system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_index_their_own_descriptor() {
        let registry = BodyRegistry::solar_system();
        for id in BodyId::ALL {
            assert_eq!(registry.get(id).id, id);
            assert_eq!(BodyId::from_index(id.index()), Some(id));
        }
        assert_eq!(BodyId::from_index(BODY_COUNT), None);
    }

    #[test]
    fn nine_planets_one_satellite_one_star() {
        let registry = BodyRegistry::solar_system();
        assert_eq!(registry.planets().count(), 9);
        assert_eq!(registry.satellites().count(), 1);
        assert_eq!(registry.star().kind, BodyKind::Star);
        let moon = registry.get(BodyId::Moon);
        assert_eq!(moon.kind, BodyKind::Satellite { parent: BodyId::Earth });
    }

    #[test]
    fn only_saturn_and_uranus_have_rings() {
        let registry = BodyRegistry::solar_system();
        let ringed: Vec<BodyId> = registry.iter().filter(|b| b.ring.is_some()).map(|b| b.id).collect();
        assert_eq!(ringed, vec![BodyId::Saturn, BodyId::Uranus]);
        for body in registry.iter().filter_map(|b| b.ring) {
            assert!(body.inner_radius < body.outer_radius);
        }
    }

    #[test]
    fn texture_keys_are_distinct() {
        let registry = BodyRegistry::solar_system();
        let bodies: Vec<_> = registry.iter().collect();
        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                assert!(!a.texture_key.eq_ignore_ascii_case(b.texture_key));
            }
        }
    }

    #[test]
    fn find_by_texture_is_case_insensitive() {
        let registry = BodyRegistry::solar_system();
        let hit = registry.find_by_texture("https://host/IMAGE/Mars.JPG").unwrap();
        assert_eq!(hit.id, BodyId::Mars);
        assert!(registry.find_by_texture("./image/stars.jpg").is_none());
    }

    #[test]
    fn by_name_reports_unknown_bodies() {
        let registry = BodyRegistry::solar_system();
        assert_eq!(registry.by_name("jupiter").unwrap().id, BodyId::Jupiter);
        assert!(matches!(registry.by_name("Vulcan"), Err(OrreryError::UnknownBody(_))));
    }
}
