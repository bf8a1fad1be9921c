/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and validation
/// - [`jwt`]: Access and refresh token generation and validation
/// - [`middleware`]: Bearer token parsing and the request `AuthContext`
/// - [`authorization`]: Role checks and project/resource access rules
///
/// # Example
///
/// ```no_run
/// use feedbackhub_shared::auth::password::{hash_password, verify_password};
/// use feedbackhub_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
/// use feedbackhub_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Access);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// let validated = validate_access_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(validated.role, UserRole::User);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
