//! Form models of the demo application.

use crate::annotation::ClassDecl;

pub fn login_form() -> ClassDecl {
    ClassDecl::new("LoginForm")
        .doc("/** Login model. */")
        .property(
            "username",
            "/**
              * @Validator Required(false, 'username field is required')
              * @Validator Length(4, 20, 'username must contain 4 to 20 characters')
              */",
        )
        .property(
            "password",
            "/**
              * @Validator Required(false, 'password field is required')
              * @Attribute type=password
              */",
        )
}

pub fn register_form() -> ClassDecl {
    ClassDecl::new("RegisterForm")
        .doc("/** Registration model. */")
        .property(
            "username",
            "/**
              * @Validator Required()
              * @Validator Length(4, 20)
              * @DisplayName Username
              */",
        )
        .property(
            "password",
            "/**
              * @Validator Required()
              * @Validator MinLength(6)
              * @DisplayName Password
              * @Attribute type=password
              */",
        )
        .property(
            "rePassword",
            "/**
              * @Validator Compare('password')
              * @DisplayName Confirm Password
              * @Attribute type=password
              */",
        )
        .property(
            "birthday",
            "/**
              * @VarType DateTime
              * @Validator Required()
              * @Validator Date()
              * @DisplayName Birthday
              * @Attribute type=date
              */",
        )
        .property(
            "gender",
            "/**
              * @VarType Gender
              * @Validator Required()
              * @DisplayName Gender
              */",
        )
        .property(
            "languages",
            "/**
              * @VarType Language[]
              * @Validator Required(false, 'At least one language is required')
              * @DisplayName Languages
              */",
        )
        .property(
            "agree",
            "/**
              * @Validator Required(false, 'You must agree to the terms of use')
              * @DisplayText I agree to the terms of use
              */",
        )
}
