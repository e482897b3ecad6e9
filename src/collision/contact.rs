use crate::core::{BodyId, ContactPoint};
use crate::math::{Real, Vec3};

/// Maximum number of contact points kept per manifold
pub const MAX_CONTACT_POINTS: usize = 4;

/// The contact points produced for one colliding body pair.
///
/// The normal points from body A toward body B. Friction and restitution
/// are filled in by the solver from the world's contact table.
#[derive(Debug, Clone)]
pub struct ContactManifold {
    /// The first body of the pair (lower id)
    pub body_a: BodyId,

    /// The second body of the pair
    pub body_b: BodyId,

    /// The contact points, at most [`MAX_CONTACT_POINTS`]
    pub contacts: Vec<ContactPoint>,

    /// The shared contact normal, pointing from A toward B
    pub normal: Vec3,

    /// Friction coefficient for this pair
    pub friction: Real,

    /// Restitution coefficient for this pair
    pub restitution: Real,
}

impl ContactManifold {
    /// Creates an empty manifold for a body pair
    pub fn new(body_a: BodyId, body_b: BodyId) -> Self {
        Self {
            body_a,
            body_b,
            contacts: Vec::with_capacity(MAX_CONTACT_POINTS),
            normal: Vec3::zeros(),
            friction: 0.0,
            restitution: 0.0,
        }
    }

    /// Adds a contact point, evicting the shallowest existing point once
    /// the manifold is full
    pub fn add_contact(&mut self, contact: ContactPoint) {
        if self.contacts.len() < MAX_CONTACT_POINTS {
            self.contacts.push(contact);
            return;
        }

        let mut min_idx = 0;
        let mut min_pen = self.contacts[0].penetration;
        for (i, c) in self.contacts.iter().enumerate().skip(1) {
            if c.penetration < min_pen {
                min_idx = i;
                min_pen = c.penetration;
            }
        }
        if contact.penetration > min_pen {
            self.contacts[min_idx] = contact;
        }
    }

    /// Returns whether the manifold holds no contacts
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Returns the deepest penetration among the contacts
    pub fn max_penetration(&self) -> Real {
        self.contacts
            .iter()
            .map(|c| c.penetration)
            .fold(0.0, Real::max)
    }
}
