// 🔧 Technician Entity
// Support staff a request can be assigned to

use crate::store::{EntityKind, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicianData {
    pub name: String,

    /// Specialty or area, free text ("Redes", "Hardware", ...)
    pub specialty: Option<String>,
}

impl TechnicianData {
    pub fn new(name: impl Into<String>, specialty: Option<&str>) -> Self {
        Self {
            name: name.into(),
            specialty: specialty.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technician {
    pub id: i64,
    pub name: String,
    pub specialty: Option<String>,
}

impl Technician {
    pub fn from_data(id: i64, data: TechnicianData) -> Self {
        Technician {
            id,
            name: data.name,
            specialty: data.specialty,
        }
    }
}

impl Record for Technician {
    type Data = TechnicianData;

    const KIND: EntityKind = EntityKind::Technician;

    fn id(&self) -> i64 {
        self.id
    }
}
