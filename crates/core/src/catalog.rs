//! Static catalog of schema-driven entities.
//!
//! Each declaration here becomes a full CRUD resource under `/api/{path}`
//! via the generic entity router; adding an entity means adding a schema,
//! not writing a route module.

use crate::schema::{DataType, EntitySchema, FieldDef, IdStrategy, JoinSpec};

/// Operating status shared by all equipment entities.
const STATUT: &[&str] = &["en_service", "hors_service", "maintenance"];

const fn text(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        data_type: DataType::Text,
        required: false,
        options: &[],
    }
}

const fn req_text(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        data_type: DataType::Text,
        required: true,
        options: &[],
    }
}

const fn number(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        data_type: DataType::Number,
        required: false,
        options: &[],
    }
}

const fn boolean(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        data_type: DataType::Boolean,
        required: false,
        options: &[],
    }
}

const fn date(name: &'static str) -> FieldDef {
    FieldDef {
        name,
        data_type: DataType::Date,
        required: false,
        options: &[],
    }
}

const fn choice(name: &'static str, options: &'static [&'static str]) -> FieldDef {
    FieldDef {
        name,
        data_type: DataType::Enum,
        required: false,
        options,
    }
}

/// Manufacturer / supplier display labels joined onto equipment rows.
static VENDOR_JOINS: [JoinSpec; 2] = [
    JoinSpec {
        fk_field: "fabricant_id",
        table: "fabricant",
        label_column: "nom",
        alias: "fabricant_nom",
    },
    JoinSpec {
        fk_field: "fournisseur_id",
        table: "fournisseurs",
        label_column: "nom",
        alias: "fournisseur_nom",
    },
];

// ---------------------------------------------------------------------------
// Sites
// ---------------------------------------------------------------------------

static TDL_FIELDS: [FieldDef; 6] = [
    req_text("nom"),
    text("adresse"),
    text("ville"),
    text("region"),
    text("responsable"),
    text("telephone"),
];

pub static TDL: EntitySchema = EntitySchema {
    name: "TDL",
    table: "tdl",
    path: "tdl",
    id: IdStrategy::ClientKey,
    fields: &TDL_FIELDS,
    display: &["nom", "ville", "region", "responsable"],
    joins: &[],
};

static TSF_FIELDS: [FieldDef; 5] = [
    req_text("nom"),
    text("adresse"),
    text("ville"),
    text("tdl_id"),
    choice("type", &["principal", "relais", "abri"]),
];

pub static TSF: EntitySchema = EntitySchema {
    name: "TSF",
    table: "tsf",
    path: "tsf",
    id: IdStrategy::ClientKey,
    fields: &TSF_FIELDS,
    display: &["nom", "ville", "type"],
    joins: &[],
};

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

static FOURNISSEURS_FIELDS: [FieldDef; 6] = [
    req_text("nom"),
    text("contact"),
    text("courriel"),
    text("telephone"),
    text("adresse"),
    text("ville"),
];

pub static FOURNISSEURS: EntitySchema = EntitySchema {
    name: "Fournisseur",
    table: "fournisseurs",
    path: "fournisseurs",
    id: IdStrategy::Auto,
    fields: &FOURNISSEURS_FIELDS,
    display: &["nom", "contact", "telephone", "ville"],
    joins: &[],
};

static FABRICANT_FIELDS: [FieldDef; 4] = [
    number("num"),
    req_text("nom"),
    text("contact"),
    text("courriel"),
];

pub static FABRICANT: EntitySchema = EntitySchema {
    name: "Fabricant",
    table: "fabricant",
    path: "fabricant",
    id: IdStrategy::Auto,
    fields: &FABRICANT_FIELDS,
    display: &["num", "nom", "contact"],
    joins: &[],
};

// ---------------------------------------------------------------------------
// Equipment
// ---------------------------------------------------------------------------

static AC_FIELDS: [FieldDef; 10] = [
    req_text("tdl_id"),
    text("modele"),
    text("no_serie"),
    number("fabricant_id"),
    number("fournisseur_id"),
    number("capacite"),
    number("tension"),
    date("date_installation"),
    choice("statut", STATUT),
    text("remarque"),
];

pub static AC: EntitySchema = EntitySchema {
    name: "AC",
    table: "ac",
    path: "ac",
    id: IdStrategy::Auto,
    fields: &AC_FIELDS,
    display: &["tdl_id", "modele", "capacite", "statut"],
    joins: &VENDOR_JOINS,
};

static DC_FIELDS: [FieldDef; 10] = [
    req_text("tdl_id"),
    text("modele"),
    text("no_serie"),
    number("fabricant_id"),
    number("fournisseur_id"),
    number("capacite"),
    number("tension"),
    date("date_installation"),
    choice("statut", STATUT),
    text("remarque"),
];

pub static DC: EntitySchema = EntitySchema {
    name: "DC",
    table: "dc",
    path: "dc",
    id: IdStrategy::Auto,
    fields: &DC_FIELDS,
    display: &["tdl_id", "modele", "capacite", "statut"],
    joins: &VENDOR_JOINS,
};

static HVAC_FIELDS: [FieldDef; 10] = [
    req_text("tdl_id"),
    text("modele"),
    text("no_serie"),
    number("fabricant_id"),
    number("fournisseur_id"),
    number("tonnage"),
    text("refrigerant"),
    date("date_installation"),
    choice("statut", STATUT),
    text("remarque"),
];

pub static HVAC: EntitySchema = EntitySchema {
    name: "HVAC",
    table: "hvac",
    path: "hvac",
    id: IdStrategy::Auto,
    fields: &HVAC_FIELDS,
    display: &["tdl_id", "modele", "tonnage", "statut"],
    joins: &VENDOR_JOINS,
};

static GEN_TSW_FIELDS: [FieldDef; 11] = [
    req_text("tdl_id"),
    choice("type", &["generatrice", "transfert"]),
    text("modele"),
    text("no_serie"),
    number("fabricant_id"),
    number("fournisseur_id"),
    number("puissance"),
    choice("carburant", &["diesel", "naturel", "propane"]),
    date("date_installation"),
    choice("statut", STATUT),
    text("remarque"),
];

pub static GEN_TSW: EntitySchema = EntitySchema {
    name: "GenTsw",
    table: "gen_tsw",
    path: "gen-tsw",
    id: IdStrategy::Auto,
    fields: &GEN_TSW_FIELDS,
    display: &["tdl_id", "type", "modele", "puissance", "statut"],
    joins: &VENDOR_JOINS,
};

static AUTRE_FIELDS: [FieldDef; 10] = [
    req_text("tdl_id"),
    req_text("description"),
    text("categorie"),
    text("modele"),
    text("no_serie"),
    number("fabricant_id"),
    number("fournisseur_id"),
    date("date_installation"),
    choice("statut", STATUT),
    text("remarque"),
];

pub static AUTRE: EntitySchema = EntitySchema {
    name: "Autre",
    table: "autre",
    path: "autre",
    id: IdStrategy::Auto,
    fields: &AUTRE_FIELDS,
    display: &["tdl_id", "description", "categorie", "statut"],
    joins: &VENDOR_JOINS,
};

static BESOIN_FIELDS: [FieldDef; 8] = [
    req_text("tdl_id"),
    req_text("description"),
    choice("priorite", &["basse", "normale", "haute"]),
    boolean("urgent"),
    choice("statut", &["ouvert", "commande", "recu", "ferme"]),
    date("date_requise"),
    number("estimation"),
    text("remarque"),
];

pub static BESOIN: EntitySchema = EntitySchema {
    name: "Besoin",
    table: "besoin",
    path: "besoin",
    id: IdStrategy::Auto,
    fields: &BESOIN_FIELDS,
    display: &["tdl_id", "description", "priorite", "urgent", "statut"],
    joins: &[],
};

/// Every schema-driven entity, in mount order.
pub static ALL: [&EntitySchema; 10] = [
    &TDL,
    &TSF,
    &AC,
    &DC,
    &HVAC,
    &GEN_TSW,
    &AUTRE,
    &BESOIN,
    &FOURNISSEURS,
    &FABRICANT,
];
