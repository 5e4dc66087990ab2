use crate::enums::EnumDef;

pub static GENDER: EnumDef = EnumDef::new("Gender", &[("Male", "male"), ("Female", "female")]);

pub static LANGUAGE: EnumDef = EnumDef::new("Language", &[("Hebrew", "he"), ("English", "en")]);
