use serde::Serialize;
use utoipa::ToSchema;

/// Item tag meaning the employee carries nothing in.
pub const NOTHING_CARRIED: &str = "NO-INGRESA-NADA";

pub const DEFAULT_PERSONAL_ITEMS: [&str; 4] = [
    "BANDA-RELOJ-INTELIGENTE",
    "CELULAR-CORPORATIVO",
    "COMPUTADOR-PORTATIL",
    NOTHING_CARRIED,
];

pub const DEFAULT_TASKS: [&str; 14] = [
    "TAREAS DIARIAS DIGI",
    "APOYO TAREAS DIGI",
    "INVENTARIO",
    "INVENTARIO SELECTIVO",
    "SISTEMAS",
    "REVISIÓN DE PROCESOS",
    "SUPERVISOR / ADMIN",
    "MANTENIMIENTO",
    "PERSONAL EXTERNO",
    "COORDINADOR",
    "JEFE DE TIENDA",
    "PERSONAL SST",
    "SEGURIDAD",
    "CAJEROS",
];

/// Vocabularies a movement is validated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Catalog {
    pub personal_items: Vec<String>,
    pub tasks: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            personal_items: DEFAULT_PERSONAL_ITEMS.iter().map(|s| s.to_string()).collect(),
            tasks: DEFAULT_TASKS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Catalog {
    /// Catalog from configured lists. [`NOTHING_CARRIED`] is always offered,
    /// so an employee carrying nothing can still clock in.
    pub fn new(mut personal_items: Vec<String>, tasks: Vec<String>) -> Self {
        if lookup(&personal_items, NOTHING_CARRIED).is_none() {
            personal_items.push(NOTHING_CARRIED.to_string());
        }
        Self {
            personal_items,
            tasks,
        }
    }

    /// Canonical spelling of a personal item, if it is in the catalog.
    pub fn personal_item(&self, raw: &str) -> Option<&str> {
        lookup(&self.personal_items, raw)
    }

    /// Canonical spelling of a task, if it is in the catalog.
    pub fn task(&self, raw: &str) -> Option<&str> {
        lookup(&self.tasks, raw)
    }
}

fn lookup<'a>(entries: &'a [String], raw: &str) -> Option<&'a str> {
    let wanted = raw.trim().to_uppercase();
    entries
        .iter()
        .find(|entry| entry.to_uppercase() == wanted)
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_trimmed_and_case_insensitive() {
        let catalog = Catalog::default();
        assert_eq!(
            catalog.personal_item(" celular-corporativo "),
            Some("CELULAR-CORPORATIVO")
        );
        assert_eq!(catalog.task("revisión de procesos"), Some("REVISIÓN DE PROCESOS"));
        assert_eq!(catalog.task("CARGUE"), None);
    }

    #[test]
    fn configured_items_keep_nothing_carried() {
        let catalog = Catalog::new(vec!["LLAVES".into()], vec!["INVENTARIO".into()]);
        assert_eq!(catalog.personal_items, vec!["LLAVES".to_string(), NOTHING_CARRIED.to_string()]);
        assert_eq!(catalog.personal_item("no-ingresa-nada"), Some(NOTHING_CARRIED));

        let already = Catalog::new(vec!["no-ingresa-nada".into()], vec![]);
        assert_eq!(already.personal_items.len(), 1);
    }

    #[test]
    fn default_catalog_contains_sentinel() {
        let catalog = Catalog::default();
        assert_eq!(catalog.personal_items.len(), 4);
        assert_eq!(catalog.personal_item(NOTHING_CARRIED), Some(NOTHING_CARRIED));
        assert_eq!(catalog.tasks.len(), 14);
    }
}
